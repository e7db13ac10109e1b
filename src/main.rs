//! Demo binary: lays out a document and prints its layout tree and display
//! list.
//!
//! Usage: `docengine [markup-file] [stylesheet-file]`. Without arguments a
//! built-in sample is used. Set `RUST_LOG=debug` to follow the pipeline.

use std::fs;

use anyhow::Context;
use docengine::{DocumentWidget, EngineConfig, EngineError, InputEvent, Vec2};

const SAMPLE_MARKUP: &str = r#"<doc>
    <panel id="header" class="bar">Document engine</panel>
    <panel id="form">
        <label>Name</label> <input id="name" placeholder="your name" size="12"/>
        <textarea id="notes" cols="24" rows="3" value="first line"/>
    </panel>
</doc>"#;

const SAMPLE_STYLESHEET: &str = "
// sample theme
doc { background-color: #202020; text-color: #f0f0f0; }
.bar { background-color: #3050a0; padding-y: 8px; }
panel:hover { border-size: 1px; border-color: #ffffff; }
input, textarea { background-color: #101010; }
";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let markup = match args.next() {
        Some(path) => read(&path)?,
        None => SAMPLE_MARKUP.to_string(),
    };
    let stylesheet = match args.next() {
        Some(path) => Some((read(&path)?, path)),
        None if markup == SAMPLE_MARKUP => Some((SAMPLE_STYLESHEET.to_string(), "sample".into())),
        None => None,
    };

    let mut widget = DocumentWidget::new(EngineConfig::default());
    let mut diagnostics = widget.parse(&markup);
    if let Some((text, source)) = stylesheet {
        diagnostics.extend(widget.load_stylesheet(&text, &source));
    }
    widget.refresh();

    for diagnostic in &diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    // Hover the first node so the demo shows a tick.
    widget.dispatch(InputEvent::MouseMove(Vec2::new(10, 10)));
    let cursor = widget.tick();

    println!("{}", widget.dump()?);
    let display_list = widget.display_list()?;
    println!("{} display items, cursor {cursor:?}", display_list.len());
    for item in &display_list {
        println!("  {item:?}");
    }
    Ok(())
}

fn read(path: &str) -> anyhow::Result<String> {
    fs::read_to_string(path)
        .map_err(EngineError::from)
        .with_context(|| format!("reading {path}"))
}
