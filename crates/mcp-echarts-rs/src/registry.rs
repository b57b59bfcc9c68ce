use mcp_core_rs::Tool;
use once_cell::sync::Lazy;

use crate::tools::ChartKind;

/// The fixed tool table, in listing order.
pub static REGISTRY: Lazy<ToolRegistry> = Lazy::new(ToolRegistry::new);

pub struct ToolRegistry {
    tools: Vec<(ChartKind, Tool)>,
}

impl ToolRegistry {
    fn new() -> Self {
        let tools = ChartKind::ALL
            .into_iter()
            .map(|kind| {
                let tool = Tool::new(kind.name(), kind.description(), kind.input_schema());
                (kind, tool)
            })
            .collect();
        Self { tools }
    }

    /// Descriptors for `tools/list`.
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|(_, tool)| tool.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<ChartKind> {
        self.tools
            .iter()
            .find(|(_, tool)| tool.name == name)
            .map(|(kind, _)| *kind)
    }
}
