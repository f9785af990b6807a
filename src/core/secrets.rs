use crate::domain::model::{SecretPresence, SecretRequirement};
use std::io::Write;

/// Required names first, optional ones after. Values are never part of the output.
pub fn reminder_lines(secrets: &[SecretRequirement]) -> Vec<String> {
    let required = secrets.iter().filter(|s| s.required);
    let optional = secrets.iter().filter(|s| !s.required);

    required
        .map(|s| s.name.clone())
        .chain(optional.map(|s| format!("{} (optional)", s.name)))
        .collect()
}

pub fn write_reminders<W: Write>(
    out: &mut W,
    secrets: &[SecretRequirement],
    dashboard_hint: &str,
) -> std::io::Result<Vec<String>> {
    let lines = reminder_lines(secrets);
    writeln!(out, "📝 Don't forget to set these environment variables in the hosting dashboard:")?;
    for line in &lines {
        writeln!(out, "   - {}", line)?;
    }
    writeln!(out, "   ({})", dashboard_hint)?;
    Ok(lines)
}

pub fn write_catalogue<W: Write>(out: &mut W, secrets: &[SecretRequirement]) -> std::io::Result<()> {
    let width = secrets.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for secret in secrets {
        let marker = if secret.required { "required" } else { "optional" };
        writeln!(
            out,
            "{:<width$}  {:<8}  {}",
            secret.name,
            marker,
            secret.description,
            width = width
        )?;
    }
    Ok(())
}

/// Checks whether each name is set and non-empty. `lookup` only answers yes/no.
pub fn check_presence<F>(secrets: &[SecretRequirement], lookup: F) -> Vec<SecretPresence>
where
    F: Fn(&str) -> bool,
{
    secrets
        .iter()
        .map(|s| SecretPresence {
            name: s.name.clone(),
            required: s.required,
            present: lookup(&s.name),
        })
        .collect()
}

pub fn env_is_set(name: &str) -> bool {
    std::env::var_os(name).is_some_and(|value| !value.is_empty())
}

pub fn missing_required(presence: &[SecretPresence]) -> Vec<&str> {
    presence
        .iter()
        .filter(|p| p.required && !p.present)
        .map(|p| p.name.as_str())
        .collect()
}

pub fn write_presence<W: Write>(out: &mut W, presence: &[SecretPresence]) -> std::io::Result<()> {
    for p in presence {
        let mark = match (p.present, p.required) {
            (true, _) => "✅ set",
            (false, true) => "❌ missing",
            (false, false) => "➖ not set (optional)",
        };
        writeln!(out, "{:<28} {}", p.name, mark)?;
    }

    let missing = missing_required(presence);
    if missing.is_empty() {
        writeln!(out, "All required variables are set.")?;
    } else {
        writeln!(
            out,
            "Missing required environment variables: {}",
            missing.join(", ")
        )?;
    }
    Ok(())
}
