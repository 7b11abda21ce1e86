use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    hiding::auto_hide,
    print_info, print_section,
};

pub fn execute_autohide(options: &GlobalOptions) -> Result<()> {
    let repo = CommandInit::initialize(options)?;
    let report = auto_hide(&repo)?;

    if report.hidden.is_empty() {
        print_info("No merged commits to hide.");
    } else {
        print_section("Hiding merged", &report.hidden);
    }
    if !report.skipped.is_empty() {
        print_section("Kept because HEAD is on top of them", &report.skipped);
    }
    Ok(())
}
