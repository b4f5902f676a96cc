//! XML handler: a stable schema emitted with `quick-xml`'s `Writer`.

use std::io::{self, Write};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::handler::{scalar_value_text, AppDescriptor, Handler, HandlerDescriptor, IndentState};
use crate::module::ModuleDescriptor;
use crate::types::message::{Message, Severity};
use crate::types::property::{Property, PropertyValue};
use crate::types::rep_info::RepInfo;
use crate::types::rep_info::TriState;

pub struct XmlHandler<W: Write> {
    writer: Writer<W>,
    indent: IndentState,
}

impl<W: Write> XmlHandler<W> {
    pub fn new(out: W) -> Self {
        Self { writer: Writer::new_with_indent(out, b' ', 2), indent: IndentState::default() }
    }

    fn tri_state_str(state: TriState) -> &'static str {
        match state {
            TriState::True => "true",
            TriState::False => "false",
            TriState::Undetermined => "undetermined",
        }
    }

    fn severity_str(sev: Severity) -> &'static str {
        match sev {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    fn write_property(&mut self, property: &Property) -> io::Result<()> {
        let mut start = BytesStart::new("property");
        start.push_attribute(("name", property.name.as_str()));
        match &property.value {
            PropertyValue::PropertyList(children) | PropertyValue::NisoImageMetadata(children) => {
                self.writer.write_event(Event::Start(start)).map_err(io::Error::other)?;
                for child in children {
                    self.write_property(child)?;
                }
                self.writer.write_event(Event::End(BytesEnd::new("property"))).map_err(io::Error::other)
            }
            other => {
                self.writer.write_event(Event::Start(start)).map_err(io::Error::other)?;
                let text = scalar_value_text(other).unwrap_or_default();
                self.writer.write_event(Event::Text(BytesText::new(&text))).map_err(io::Error::other)?;
                self.writer.write_event(Event::End(BytesEnd::new("property"))).map_err(io::Error::other)
            }
        }
    }

    fn write_message(&mut self, message: &Message) -> io::Result<()> {
        let mut start = BytesStart::new("message");
        start.push_attribute(("id", message.id.as_str()));
        start.push_attribute(("severity", Self::severity_str(message.severity)));
        if let Some(offset) = message.offset {
            start.push_attribute(("offset", offset.to_string().as_str()));
        }
        self.writer.write_event(Event::Start(start)).map_err(io::Error::other)?;
        self.writer.write_event(Event::Text(BytesText::new(&message.text))).map_err(io::Error::other)?;
        self.writer.write_event(Event::End(BytesEnd::new("message"))).map_err(io::Error::other)
    }
}

impl<W: Write> Handler for XmlHandler<W> {
    fn show_header(&mut self) -> io::Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new("jhove-output")))
            .map_err(io::Error::other)
    }

    fn show_app(&mut self, app: &AppDescriptor) -> io::Result<()> {
        let mut start = BytesStart::new("app");
        start.push_attribute(("name", app.name));
        start.push_attribute(("release", app.release));
        start.push_attribute(("date", app.date));
        self.writer.write_event(Event::Empty(start)).map_err(io::Error::other)
    }

    fn show_handler(&mut self, handler: &HandlerDescriptor) -> io::Result<()> {
        let mut start = BytesStart::new("handler");
        start.push_attribute(("name", handler.name));
        start.push_attribute(("release", handler.release));
        start.push_attribute(("vendor", handler.vendor));
        self.writer.write_event(Event::Empty(start)).map_err(io::Error::other)
    }

    fn show_module(&mut self, module: &ModuleDescriptor) -> io::Result<()> {
        let mut start = BytesStart::new("module");
        start.push_attribute(("name", module.name));
        start.push_attribute(("release", module.release));
        self.writer.write_event(Event::Empty(start)).map_err(io::Error::other)
    }

    fn show_rep_info(&mut self, info: &RepInfo) -> io::Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new("repInfo")))
            .map_err(io::Error::other)?;

        let mut uri = BytesStart::new("uri");
        uri.push_attribute(("value", info.uri.as_str()));
        self.writer.write_event(Event::Empty(uri)).map_err(io::Error::other)?;

        self.writer
            .write_event(Event::Start(BytesStart::new("status")))
            .map_err(io::Error::other)?;
        let status = format!(
            "wellFormed={} valid={}",
            Self::tri_state_str(info.well_formed),
            Self::tri_state_str(info.valid)
        );
        self.writer
            .write_event(Event::Text(BytesText::new(&status)))
            .map_err(io::Error::other)?;
        self.writer
            .write_event(Event::End(BytesEnd::new("status")))
            .map_err(io::Error::other)?;

        if !info.properties.is_empty() {
            self.writer
                .write_event(Event::Start(BytesStart::new("properties")))
                .map_err(io::Error::other)?;
            for property in &info.properties {
                self.write_property(property)?;
            }
            self.writer
                .write_event(Event::End(BytesEnd::new("properties")))
                .map_err(io::Error::other)?;
        }

        if !info.messages.is_empty() {
            self.writer
                .write_event(Event::Start(BytesStart::new("messages")))
                .map_err(io::Error::other)?;
            for message in &info.messages {
                self.write_message(message)?;
            }
            self.writer
                .write_event(Event::End(BytesEnd::new("messages")))
                .map_err(io::Error::other)?;
        }

        self.writer
            .write_event(Event::End(BytesEnd::new("repInfo")))
            .map_err(io::Error::other)
    }

    fn show_footer(&mut self) -> io::Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new("jhove-output")))
            .map_err(io::Error::other)
    }

    fn close(&mut self) -> io::Result<()> {
        self.writer.get_mut().flush()
    }

    fn start_directory(&mut self, path: &str) -> io::Result<()> {
        self.indent.push();
        let mut start = BytesStart::new("directory");
        start.push_attribute(("path", path));
        self.writer.write_event(Event::Empty(start)).map_err(io::Error::other)
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
    use crate::types::rep_info::RepInfo;

    #[test]
    fn renders_properties_and_messages() {
        let mut buf = Vec::new();
        {
            let mut handler = XmlHandler::new(&mut buf);
            let mut info = RepInfo::new("file:///tmp/a.tif");
            info.add_property(Property::integer("ImageWidth", 100));
            info.add_message(Message::error("TIFF-HUL-2", "tags out of order"));
            handler.show_rep_info(&info).unwrap();
        }
        let xml = String::from_utf8(buf).unwrap();
        assert!(xml.contains("<properties>"));
        assert!(xml.contains(r#"name="ImageWidth""#));
        assert!(xml.contains("100"));
        assert!(xml.contains("<messages>"));
        assert!(xml.contains("TIFF-HUL-2"));
    }

    #[test]
    fn omits_empty_properties_and_messages_sections() {
        let mut buf = Vec::new();
        {
            let mut handler = XmlHandler::new(&mut buf);
            let info = RepInfo::new("file:///tmp/empty.tif");
            handler.show_rep_info(&info).unwrap();
        }
        let xml = String::from_utf8(buf).unwrap();
        assert!(!xml.contains("<properties>"));
        assert!(!xml.contains("<messages>"));
    }
}
