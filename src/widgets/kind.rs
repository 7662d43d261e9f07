//! Widget kinds and their documented defaults.
//!
//! The engine does not model widget behavior; a kind is a capability tag
//! carrying the remote type name, the default property values (the diff
//! baseline for a freshly created widget), and the event names the kind can
//! notify.

use crate::protocol::PropertyValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Shell,
    Composite,
    Button,
    Label,
    Slider,
    TabFolder,
    TabItem,
}

impl WidgetKind {
    /// The type tag sent in the Create operation.
    pub fn remote_type(&self) -> &'static str {
        match self {
            WidgetKind::Shell => "ui.Shell",
            WidgetKind::Composite => "ui.Composite",
            WidgetKind::Button => "ui.Button",
            WidgetKind::Label => "ui.Label",
            WidgetKind::Slider => "ui.Slider",
            WidgetKind::TabFolder => "ui.TabFolder",
            WidgetKind::TabItem => "ui.TabItem",
        }
    }

    /// Whether the kind is a positioned control (has bounds etc.).
    pub fn is_control(&self) -> bool {
        !matches!(self, WidgetKind::TabItem)
    }

    /// Default value of a property for this kind. Properties at their
    /// default are never rendered into the Create payload.
    pub fn default_property(&self, name: &str) -> PropertyValue {
        match (self, name) {
            (_, "enabled") | (_, "visible") if self.is_control() => PropertyValue::Bool(true),
            (_, "bounds") if self.is_control() => PropertyValue::IntList(vec![0, 0, 0, 0]),
            (WidgetKind::Shell, "title") => PropertyValue::Str(String::new()),
            (WidgetKind::Shell, "active") => PropertyValue::Bool(false),
            (WidgetKind::Button, "text")
            | (WidgetKind::Label, "text")
            | (WidgetKind::TabItem, "text") => PropertyValue::Str(String::new()),
            (WidgetKind::Slider, "minimum") => PropertyValue::Int(0),
            (WidgetKind::Slider, "maximum") => PropertyValue::Int(100),
            (WidgetKind::Slider, "selection") => PropertyValue::Int(0),
            (WidgetKind::Slider, "increment") => PropertyValue::Int(1),
            (WidgetKind::Slider, "pageIncrement") => PropertyValue::Int(10),
            (WidgetKind::Slider, "thumb") => PropertyValue::Int(10),
            (WidgetKind::TabFolder, "selection") => PropertyValue::Int(-1),
            _ => PropertyValue::Null,
        }
    }
}
