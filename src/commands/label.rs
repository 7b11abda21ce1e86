use crate::core::{
    annotate::attach_label,
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    print_success,
};

pub fn execute_label(options: &GlobalOptions, rev: &str, prefix: Option<&str>) -> Result<()> {
    let mut repo = CommandInit::initialize(options)?;
    let (label, outcome) = attach_label(&mut repo, rev, prefix)?;

    print_success(&format!("Labeled {} as {label}.", outcome.amended.sha));
    Ok(())
}
