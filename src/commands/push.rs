use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    print_info, print_section,
    push::push_commits,
};

pub fn execute_push(options: &GlobalOptions, remote: Option<String>, rev: &str) -> Result<()> {
    let mut repo = CommandInit::initialize(options)?;
    let remote = remote.unwrap_or_else(|| repo.remote.clone());

    let pushed = push_commits(&mut repo, &remote, rev)?;
    if pushed.is_empty() {
        print_info(&format!("Nothing under {rev} has an upstream on {remote}."));
    } else {
        print_section("Pushed", &pushed);
    }
    Ok(())
}
