//! JSON handler: serializes RepInfo trees with `serde_json`.

use std::io::{self, Write};

use serde_json::json;

use crate::handler::{AppDescriptor, Handler, HandlerDescriptor, IndentState};
use crate::module::ModuleDescriptor;
use crate::types::rep_info::RepInfo;

pub struct JsonHandler<W: Write> {
    out: W,
    indent: IndentState,
    first_item: bool,
}

impl<W: Write> JsonHandler<W> {
    pub fn new(out: W) -> Self {
        Self { out, indent: IndentState::default(), first_item: true }
    }
}

impl<W: Write> Handler for JsonHandler<W> {
    fn show_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{{\"results\":[")
    }

    fn show_app(&mut self, app: &AppDescriptor) -> io::Result<()> {
        let value = json!({ "name": app.name, "release": app.release, "date": app.date, "rights": app.rights });
        writeln!(self.out, "{value}")
    }

    fn show_handler(&mut self, handler: &HandlerDescriptor) -> io::Result<()> {
        let value = json!({
            "name": handler.name,
            "release": handler.release,
            "date": handler.date,
            "vendor": handler.vendor,
            "note": handler.note,
        });
        writeln!(self.out, "{value}")
    }

    fn show_module(&mut self, module: &ModuleDescriptor) -> io::Result<()> {
        let value = json!({ "name": module.name, "release": module.release });
        writeln!(self.out, "{value}")
    }

    fn show_rep_info(&mut self, info: &RepInfo) -> io::Result<()> {
        if !self.first_item {
            write!(self.out, ",")?;
        }
        self.first_item = false;
        let value = serde_json::to_string(info).unwrap_or_else(|_| "null".to_string());
        writeln!(self.out, "{value}")
    }

    fn show_footer(&mut self) -> io::Result<()> {
        writeln!(self.out, "]}}")
    }

    fn close(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn start_directory(&mut self, _path: &str) -> io::Result<()> {
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
