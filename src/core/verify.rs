use crate::adapters::HealthClient;
use crate::domain::model::HealthReport;
use crate::utils::error::Result;
use std::io::Write;
use std::time::Duration;

pub async fn verify_deployment(base_url: &str, timeout: Duration) -> Result<HealthReport> {
    let client = HealthClient::new(timeout)?;
    client.check(base_url).await
}

pub fn write_health<W: Write>(out: &mut W, report: &HealthReport) -> std::io::Result<()> {
    writeln!(out, "🌐 {}", report.base_url)?;
    writeln!(out, "   Message: {}", report.root_message)?;
    let icon = if report.status == "healthy" { "✅" } else { "❌" };
    writeln!(out, "{} Status: {}", icon, report.status)?;
    match report.supabase_configured {
        Some(true) => writeln!(out, "   Supabase configured: yes")?,
        Some(false) => writeln!(out, "   Supabase configured: no (check the dashboard secrets)")?,
        None => {}
    }
    for guard in &report.auth_guards {
        if guard.is_guarded() {
            writeln!(out, "✅ {} requires authentication", guard.route)?;
        } else {
            writeln!(
                out,
                "❌ {} should require authentication but returned {}",
                guard.route, guard.status
            )?;
        }
    }
    Ok(())
}
