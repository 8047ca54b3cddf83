use std::sync::Arc;

use tracing::info;

use alert_cell::{AlertPoller, AlertService, AlertSource, DashboardState, DashboardSummary};
use shared_config::AppConfig;

pub async fn run(watch: bool, config: &AppConfig) -> anyhow::Result<()> {
    let service = AlertService::new(config)?;

    if !watch {
        let alerts = service.fetch_today().await?;
        print_summary(&DashboardSummary::from_alerts(&alerts));
        return Ok(());
    }

    let period = config.alert_poll_interval();
    info!("Watching today's alerts every {}s", period.as_secs());
    let poller = AlertPoller::spawn(Arc::new(service), period);
    let mut updates = poller.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_state(&state);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping dashboard");
                break;
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}

fn print_state(state: &DashboardState) {
    if state.loading {
        println!("Carregando...");
        return;
    }
    match state.summary() {
        Some(summary) => {
            if let Some(at) = state.refreshed_at {
                println!("\nAtualizado às {}", at.format("%H:%M:%S"));
            }
            print_summary(&summary);
        }
        None => println!("Sem dados de alertas."),
    }
}

fn print_summary(summary: &DashboardSummary) {
    println!("Consultas agendadas hoje: {}", summary.total_scheduled);
    for level in &summary.by_level {
        println!("  {:<8} {}", level.label, level.count);
    }

    if summary.consultations.is_empty() {
        return;
    }
    println!();
    for alert in &summary.consultations {
        println!(
            "{:>4}  {:<8} {}  {}  {} ({})  {}",
            alert.score_de_risco,
            alert.score_level().label(),
            alert.hora_consulta,
            alert.nome_paciente,
            alert.nome_medico,
            alert.especialidade_consulta,
            alert.telefone_paciente,
        );
    }
}
