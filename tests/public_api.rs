#![allow(unused_imports)]

use miniapp_chat::{
    paint, visible_width, wrap_text, Bubble, BubbleProps, Component, NodeId, NodeTree, Palette,
    Presentation, RoleClass, TextDirection, Theme, THINKING_TEXT,
};

#[test]
fn public_api_exports_compile() {}
