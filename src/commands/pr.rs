use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    links::pr_links,
};

pub fn execute_pr(options: &GlobalOptions, rev: &str) -> Result<()> {
    let repo = CommandInit::initialize(options)?;
    for link in pr_links(&repo, rev)? {
        println!("{link}");
    }
    Ok(())
}
