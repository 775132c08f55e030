use std::str::FromStr;

use accordion_config::Settings;
use accordion_dom::{Document, DomEvent, Key, LayoutBox, NodeId};
use accordion_widget::{Accordion, Subscription};
use anyhow::{Context, Result, anyhow, bail};
use log::info;

const DEFAULT_MARKUP: &str = r#"<!doctype html>
<html>
  <body>
    <div id="faq">
      <h3>What is this?</h3>
      <div><p>A disclosure widget built from header and content pairs.</p></div>
      <h3>Is it accessible?</h3>
      <div><p>Controls carry <code>aria-*</code> state and respond to the keyboard.</p><p>Arrow keys move focus.</p></div>
      <h3>Can panels sit side by side?</h3>
      <div><p>Yes, in horizontal mode.</p></div>
    </div>
  </body>
</html>"#;

const DEFAULT_SCRIPT: &[&str] = &["click:0", "tick:400", "key:0:ArrowDown", "key:1:Enter", "tick:400", "click:1"];

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Click(usize),
    Key(usize, Key),
    Tick(f32),
    Resize,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split(':');
        let step = match (parts.next(), parts.next(), parts.next()) {
            (Some("click"), Some(index), None) => Step::Click(index.parse()?),
            (Some("key"), Some(index), Some(name)) => Step::Key(index.parse()?, Key::from_name(name)),
            (Some("tick"), Some(ms), None) => {
                let ms: f32 = ms.parse()?;
                if !ms.is_finite() || ms < 0.0 {
                    bail!("tick duration must be a finite, non-negative number of ms, got '{s}'");
                }
                Step::Tick(ms)
            }
            (Some("resize"), None, None) => Step::Resize,
            _ => bail!("unrecognised script step '{s}'"),
        };
        Ok(step)
    }
}

/// Stand-in for a rendering surface: stack the container's children
/// vertically, sizing each by the amount of text it holds.
fn measure(doc: &mut Document, container: NodeId) {
    let mut top = 0.0;
    for child in doc.element_children(container) {
        let lines = doc.text_content(child).len().div_ceil(60).max(1);
        let height = 24.0 * lines as f64 + 16.0;
        doc.set_layout_box(child, LayoutBox::new(top, height));
        top += height;
    }
}

fn control_at(accordion: &Accordion, index: usize) -> Result<NodeId> {
    accordion
        .pairs()
        .get(index)
        .map(|pair| pair.control)
        .with_context(|| format!("no control at index {index}"))
}

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::load();
    let mut doc = match &settings.demo.markup {
        Some(path) => Document::from_file(path)?,
        None => Document::parse_html(DEFAULT_MARKUP),
    };
    let container = match &settings.demo.container {
        Some(id) => doc
            .find_by_id(id)
            .with_context(|| format!("no element with id '{id}'"))?,
        None => doc
            .descendants(doc.root())
            .into_iter()
            .find(|node| doc.tag(*node) == Some("div"))
            .ok_or_else(|| anyhow!("markup has no div to host the accordion"))?,
    };
    measure(&mut doc, container);

    let mut accordion = Accordion::initialize(&mut doc, container, settings.accordion.clone())?
        .context("container already hosts an accordion")?;
    accordion.subscribe(Subscription::All, |event| info!("notification: {event:?}"));

    let script: Vec<Step> = if settings.demo.script.is_empty() {
        DEFAULT_SCRIPT.iter().map(|s| s.parse()).collect::<Result<_>>()?
    } else {
        settings
            .demo
            .script
            .iter()
            .map(|s| s.parse())
            .collect::<Result<_>>()?
    };

    for step in script {
        match step {
            Step::Click(index) => {
                let target = control_at(&accordion, index)?;
                accordion.handle_event(&mut doc, &DomEvent::Click { target });
            }
            Step::Key(index, key) => {
                let target = control_at(&accordion, index)?;
                accordion.handle_event(&mut doc, &DomEvent::KeyDown { target, key });
            }
            Step::Tick(ms) => {
                let mut remaining = ms;
                while remaining > 0.0 {
                    let frame = remaining.min(16.0);
                    accordion.update(&mut doc, frame);
                    remaining -= frame;
                }
            }
            Step::Resize => {
                measure(&mut doc, container);
                accordion.handle_event(&mut doc, &DomEvent::Resize);
            }
        }
        if let Err(violation) = accordion.check_invariants(&doc) {
            bail!("after {step:?}: {violation}");
        }
    }

    println!("{}", doc.to_html(container));
    for event in accordion.drain_events() {
        println!("event: {event:?}");
    }
    while let Some(command) = doc.pop_command() {
        println!("viewport: {command:?}");
    }
    if let Some(focused) = doc.focused() {
        println!("focus: {}", doc.attr(focused, "id").unwrap_or_default());
    }

    accordion.destroy(&mut doc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_steps() {
        assert_eq!("click:2".parse::<Step>().unwrap(), Step::Click(2));
        assert_eq!(
            "key:0:ArrowLeft".parse::<Step>().unwrap(),
            Step::Key(0, Key::ArrowLeft)
        );
        assert_eq!("tick:250".parse::<Step>().unwrap(), Step::Tick(250.0));
        assert_eq!("resize".parse::<Step>().unwrap(), Step::Resize);
        assert!("hover:1".parse::<Step>().is_err());
        assert!("click:x".parse::<Step>().is_err());
        assert!("tick:inf".parse::<Step>().is_err());
        assert!("tick:NaN".parse::<Step>().is_err());
        assert!("tick:-5".parse::<Step>().is_err());
    }

    #[test]
    fn default_script_is_valid() {
        for step in DEFAULT_SCRIPT {
            step.parse::<Step>().unwrap();
        }
    }
}
