use parley_config::ParleyConfig;

use crate::builtin;

pub(super) fn cmd_skills(config: &ParleyConfig) -> parley_core::Result<()> {
    let skills = builtin::registry(config)?;
    println!("{} skill(s) registered\n", skills.count());
    for skill in skills.list() {
        let settings = skill.config().settings.len();
        println!(
            "  {:<16} {:<32} {} setting(s)",
            skill.name(),
            skill.predicate().describe(),
            settings
        );
    }
    Ok(())
}
