use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    print_info, print_section, print_success,
    restack::{fixup, FixupOutcome},
};

pub fn execute_fixup(options: &GlobalOptions) -> Result<()> {
    let mut repo = CommandInit::initialize(options)?;

    match fixup(&mut repo)? {
        FixupOutcome::NoAmendHistory { head } => {
            print_info(&format!("No amend history found for {head}"));
        }
        FixupOutcome::NoChildren { head } => {
            print_info(&format!("No children found for amend history of {head}"));
        }
        FixupOutcome::Restacked { head, moved } => {
            print_section(
                "Moved",
                moved.iter().map(|m| format!("{} -> {}", m.source, m.new)),
            );
            print_success(&format!("Restacked {} commit(s) onto {head}.", moved.len()));
        }
    }
    Ok(())
}
