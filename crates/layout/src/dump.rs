//! Indented text rendering of a layout tree, for diagnostics and tests.

use std::fmt::Write;

use dom::Dom;
use style::StyleMap;

use crate::tree::{LayoutNodeId, LayoutTree};

/// One line per node:
/// `> #id kind [fragments={ 'a', }] dom=tag[#id] size={ w, h } pos={ x, y }[.class]*`,
/// children indented by two more spaces. Sizes include padding.
pub fn dump_layout_tree(tree: &LayoutTree, dom: &Dom, styles: &StyleMap) -> String {
    let mut out = String::from("Layout tree:\n");
    dump_node(tree, dom, styles, tree.root(), 0, &mut out);
    out
}

fn dump_node(
    tree: &LayoutTree,
    dom: &Dom,
    styles: &StyleMap,
    id: LayoutNodeId,
    depth: usize,
    out: &mut String,
) {
    let Some(node) = tree.get(id) else {
        return;
    };

    let _ = write!(out, "{:indent$}> #{} {}", "", node.id, node.kind.name(), indent = depth * 2);

    if let Some(text) = node.inline_text().filter(|text| !text.text().is_empty()) {
        out.push_str(" fragments={");
        for fragment in &text.fragments {
            let _ = write!(out, " '{}',", escape(fragment));
        }
        out.push_str(" }");
    }

    let _ = write!(out, " dom={}", dom.tag_name(node.dom_node));
    if let Some(dom_id) = dom.attribute(node.dom_node, "id") {
        let _ = write!(out, "#{dom_id}");
    }

    let size = node.size_with_padding(crate::style_for(styles, node.dom_node));
    let _ = write!(
        out,
        " size={{ {}, {} }} pos={{ {}, {} }}",
        size.width, size.height, node.position.x, node.position.y
    );

    if let Some(dom_node) = dom.get(node.dom_node) {
        for class in dom_node.classes() {
            let _ = write!(out, ".{class}");
        }
    }
    out.push('\n');

    for &child in &node.children {
        dump_node(tree, dom, styles, child, depth + 1, out);
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_layout_tree;
    use crate::compute::{LayoutContext, compute_layout};
    use crate::measure::MonospaceMeasure;
    use common::Size;
    use style::{InheritedValues, compute_styles};

    #[test]
    fn dump_lists_every_node() {
        let mut dom = Dom::new();
        let root = dom.root();
        let div = dom.create_element("div");
        dom.set_attribute(div, "id", "main");
        dom.set_attribute(div, "class", "wide tall");
        let text = dom.create_text_fragment("it's");
        dom.append_child(root, div);
        dom.append_child(div, text);
        dom.load_stylesheet("* { padding-x: 0px; padding-y: 0px; }", "test");

        let values = InheritedValues {
            font_name: "sans".into(),
            font_size: 10,
            ..InheritedValues::default()
        };
        let styles = compute_styles(&dom, &values);
        let mut tree = build_layout_tree(&dom, &styles);
        let ctx = LayoutContext {
            dom: &dom,
            styles: &styles,
            measure: &MonospaceMeasure,
            viewport: Size::new(800, 600),
        };
        compute_layout(&mut tree, &ctx);

        let dump = dump_layout_tree(&tree, &dom, &styles);
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Layout tree:");
        assert!(lines[1].starts_with("> #"));
        assert!(lines[1].ends_with(" document dom=doc size={ 32, 18 } pos={ 0, 0 }"));
        assert!(lines[2].starts_with("  > #"));
        assert!(lines[2].ends_with(" box dom=div#main size={ 28, 14 } pos={ 2, 2 }.wide.tall"));
        assert!(lines[3].starts_with("    > #"));
        assert!(lines[3].ends_with(
            " inline fragments={ 'it\\'s', } dom=#text-fragment size={ 24, 12 } pos={ 4, 4 }"
        ));
    }
}
