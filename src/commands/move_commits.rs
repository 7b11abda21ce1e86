use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    print_section, print_success,
    restack::move_subtree,
};

pub fn execute_move(options: &GlobalOptions, source: &str, dest: &str) -> Result<()> {
    let mut repo = CommandInit::initialize(options)?;
    let moved = move_subtree(&mut repo, source, dest)?;

    print_section(
        "Moved",
        moved.iter().map(|m| format!("{} -> {}", m.source, m.new)),
    );
    print_success(&format!("Moved {} commit(s) onto {dest}.", moved.len()));
    Ok(())
}
