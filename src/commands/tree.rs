use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    print_info,
    render::render_tree,
    vcs::Vcs,
};
use std::io::IsTerminal;

pub fn execute_tree(options: &GlobalOptions, json: bool) -> Result<()> {
    let repo = CommandInit::initialize(options)?;
    let tree = repo.build_tree()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    if tree.trunk_nodes.is_empty() && tree.orphan_roots.is_empty() {
        print_info("Nothing to show.");
        return Ok(());
    }

    // A repository without commits has no HEAD; render without a marker
    let head = repo.vcs.head().ok().map(|c| c.sha);
    println!("{}", render_tree(&tree, head.as_deref(), std::io::stdout().is_terminal()));
    Ok(())
}
