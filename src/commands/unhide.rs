use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    hiding::unhide_revs,
    print_section,
};

pub fn execute_unhide(options: &GlobalOptions, revs: Vec<String>) -> Result<()> {
    let repo = CommandInit::initialize(options)?;
    let unhidden = unhide_revs(&repo, &revs)?;
    print_section("Unhiding", &unhidden);
    Ok(())
}
