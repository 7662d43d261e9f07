//! Built-in adapters for the shipped widget kinds.
//!
//! Each adapter is a tracked-property declaration; the generic diff logic
//! lives in the trait's default methods. Kinds with special render needs
//! override the defaults (none of the built-ins currently do).

use crate::lifecycle::adapter::LifeCycleAdapter;
use crate::widgets::WidgetKind;

pub(crate) fn builtin_adapters() -> Vec<Box<dyn LifeCycleAdapter>> {
    vec![
        Box::new(ShellAdapter),
        Box::new(CompositeAdapter),
        Box::new(ButtonAdapter),
        Box::new(LabelAdapter),
        Box::new(SliderAdapter),
        Box::new(TabFolderAdapter),
        Box::new(TabItemAdapter),
    ]
}

pub struct ShellAdapter;

impl LifeCycleAdapter for ShellAdapter {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Shell
    }

    fn tracked_properties(&self) -> &[&str] {
        &["title", "active", "bounds", "enabled", "visible"]
    }

    fn listen_events(&self) -> &[&str] {
        &["close"]
    }
}

pub struct CompositeAdapter;

impl LifeCycleAdapter for CompositeAdapter {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Composite
    }

    fn tracked_properties(&self) -> &[&str] {
        &["bounds", "enabled", "visible"]
    }
}

pub struct ButtonAdapter;

impl LifeCycleAdapter for ButtonAdapter {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn tracked_properties(&self) -> &[&str] {
        &["text", "bounds", "enabled", "visible"]
    }

    fn listen_events(&self) -> &[&str] {
        &["selection"]
    }
}

pub struct LabelAdapter;

impl LifeCycleAdapter for LabelAdapter {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    fn tracked_properties(&self) -> &[&str] {
        &["text", "bounds", "enabled", "visible"]
    }
}

pub struct SliderAdapter;

impl LifeCycleAdapter for SliderAdapter {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Slider
    }

    fn tracked_properties(&self) -> &[&str] {
        &[
            "minimum",
            "maximum",
            "selection",
            "increment",
            "pageIncrement",
            "thumb",
            "bounds",
            "enabled",
            "visible",
        ]
    }

    fn listen_events(&self) -> &[&str] {
        &["selection"]
    }
}

pub struct TabFolderAdapter;

impl LifeCycleAdapter for TabFolderAdapter {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TabFolder
    }

    fn tracked_properties(&self) -> &[&str] {
        &["selection", "bounds", "enabled", "visible"]
    }

    fn listen_events(&self) -> &[&str] {
        &["selection"]
    }
}

pub struct TabItemAdapter;

impl LifeCycleAdapter for TabItemAdapter {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TabItem
    }

    fn tracked_properties(&self) -> &[&str] {
        &["text"]
    }
}
