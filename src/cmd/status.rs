//! Pipeline state command: `scribe status`.

use anyhow::Result;

use scribe::config::Config;
use scribe::store::ArtifactStore;
use scribe::topic::{self, TopicSpace};
use scribe::ui::print_status;

pub fn cmd_status(config: &Config, topic_name: &str) -> Result<()> {
    let slug = topic::resolve(topic_name);
    let dir = TopicSpace::new(config.output_dir()).topic_dir(topic_name);
    if !dir.is_dir() {
        println!("No outputs yet for '{}' (expected {}).", topic_name, dir.display());
        println!("Run 'scribe run --topic \"{}\"' to start.", topic_name);
        return Ok(());
    }

    let store = ArtifactStore::open(config.output_dir(), topic_name)?;
    let state = store.snapshot()?;
    print_status(&topic::resolve_to_display(&slug), store.dir(), &state);
    Ok(())
}
