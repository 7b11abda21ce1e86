use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    hiding::hide_subtrees,
    print_info, print_section,
};

pub fn execute_hide(options: &GlobalOptions, revs: Vec<String>) -> Result<()> {
    let repo = CommandInit::initialize(options)?;
    let hidden = hide_subtrees(&repo, &revs)?;

    if hidden.is_empty() {
        print_info("Nothing new to hide.");
    } else {
        print_section("Hiding", &hidden);
    }
    Ok(())
}
