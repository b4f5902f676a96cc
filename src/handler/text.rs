//! Plain-text handler: no extra crate needed, just `std::fmt`.

use std::io::{self, Write};

use crate::handler::{scalar_value_text, write_indented, AppDescriptor, Handler, HandlerDescriptor, IndentState};
use crate::module::ModuleDescriptor;
use crate::types::message::Severity;
use crate::types::property::{Property, PropertyValue};
use crate::types::rep_info::{RepInfo, TriState};

pub struct TextHandler<W: Write> {
    out: W,
    indent: IndentState,
}

impl<W: Write> TextHandler<W> {
    pub fn new(out: W) -> Self {
        Self { out, indent: IndentState::default() }
    }

    fn tri(state: TriState) -> &'static str {
        match state {
            TriState::True => "true",
            TriState::False => "false",
            TriState::Undetermined => "undetermined",
        }
    }

    fn severity(sev: Severity) -> &'static str {
        match sev {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        }
    }

    fn write_property(out: &mut W, depth: usize, property: &Property) -> io::Result<()> {
        match &property.value {
            PropertyValue::PropertyList(children) | PropertyValue::NisoImageMetadata(children) => {
                write_indented(out, depth, &format!("{}:", property.name))?;
                for child in children {
                    Self::write_property(out, depth + 1, child)?;
                }
                Ok(())
            }
            other => write_indented(out, depth, &format!("{}: {}", property.name, scalar_value_text(other).unwrap_or_default())),
        }
    }
}

impl<W: Write> Handler for TextHandler<W> {
    fn show_header(&mut self) -> io::Result<()> {
        write_indented(&mut self.out, self.indent.depth(), "Curator output")
    }

    fn show_app(&mut self, app: &AppDescriptor) -> io::Result<()> {
        write_indented(&mut self.out, self.indent.depth(), &format!("Application: {} {}", app.name, app.release))
    }

    fn show_handler(&mut self, handler: &HandlerDescriptor) -> io::Result<()> {
        write_indented(
            &mut self.out,
            self.indent.depth(),
            &format!("Handler: {} {}", handler.name, handler.release),
        )
    }

    fn show_module(&mut self, module: &ModuleDescriptor) -> io::Result<()> {
        write_indented(
            &mut self.out,
            self.indent.depth(),
            &format!("Module: {} {}", module.name, module.release),
        )
    }

    fn show_rep_info(&mut self, info: &RepInfo) -> io::Result<()> {
        let depth = self.indent.depth();
        write_indented(&mut self.out, depth, &format!("File: {}", info.uri))?;
        write_indented(
            &mut self.out,
            depth + 1,
            &format!("WellFormed: {}  Valid: {}", Self::tri(info.well_formed), Self::tri(info.valid)),
        )?;
        for property in &info.properties {
            Self::write_property(&mut self.out, depth + 1, property)?;
        }
        for message in &info.messages {
            write_indented(
                &mut self.out,
                depth + 1,
                &format!("[{}] {}: {}", message.id, Self::severity(message.severity), message.text),
            )?;
        }
        Ok(())
    }

    fn show_footer(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn start_directory(&mut self, path: &str) -> io::Result<()> {
        write_indented(&mut self.out, self.indent.depth(), &format!("Directory: {path}"))?;
        self.indent.push();
        Ok(())
    }

    fn end_directory(&mut self) -> io::Result<()> {
        self.indent.pop();
        Ok(())
    }

    fn indent(&self) -> usize {
        self.indent.depth()
    }

    fn push_indent(&mut self) {
        self.indent.push();
    }

    fn pop_indent(&mut self) {
        self.indent.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::message::Message;

    #[test]
    fn renders_rep_info_with_messages() {
        let mut buf = Vec::new();
        {
            let mut handler = TextHandler::new(&mut buf);
            let mut info = RepInfo::new("file:///tmp/a.tif");
            info.well_formed = TriState::True;
            info.valid = TriState::False;
            info.add_message(Message::error("TIFF-HUL-2", "tags out of order"));
            handler.show_rep_info(&info).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("file:///tmp/a.tif"));
        assert!(text.contains("TIFF-HUL-2"));
    }

    #[test]
    fn renders_properties_including_nested_subtrees() {
        let mut buf = Vec::new();
        {
            let mut handler = TextHandler::new(&mut buf);
            let mut info = RepInfo::new("file:///tmp/b.tif");
            info.add_property(crate::types::property::Property::integer("ImageWidth", 100));
            info.add_property(crate::types::property::Property::subtree(
                "NisoImageMetadata",
                vec![crate::types::property::Property::text("Compression", "Uncompressed")],
            ));
            handler.show_rep_info(&info).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("ImageWidth: 100"));
        assert!(text.contains("NisoImageMetadata:"));
        assert!(text.contains("Compression: Uncompressed"));
    }
}
