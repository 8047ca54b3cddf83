use anyhow::anyhow;

use patient_cell::{arrange, PatientRecord, PatientService, SortOrder, TimelineEntry, TimelineFilter};
use shared_config::AppConfig;

pub async fn history(patient_id: &str, filter: &str, sort: &str, config: &AppConfig) -> anyhow::Result<()> {
    let filter: TimelineFilter = filter.parse().map_err(anyhow::Error::msg)?;
    let order: SortOrder = sort.parse().map_err(anyhow::Error::msg)?;

    let service = PatientService::new(config)?;
    let record = load(&service, patient_id).await?;

    println!("{} ({})", record.nome, record.id_paciente);
    println!("Telefone: {}  Bairro: {}  Nascimento: {}", record.telefone, record.bairro, record.data_nascimento);
    if let Some(card) = record.risk_card() {
        println!("Score de risco: {}", card);
    }

    let entries = arrange(&record.linha_do_tempo, filter, order);
    if entries.is_empty() {
        println!("Nenhum registro na linha do tempo.");
    }
    for entry in entries {
        print_entry(entry);
    }
    Ok(())
}

pub async fn annotate(patient_id: &str, text: &str, config: &AppConfig) -> anyhow::Result<()> {
    let service = PatientService::new(config)?;
    let mut record = load(&service, patient_id).await?;

    let entry = service.add_annotation(&mut record, text).await?;
    println!("Anotação registrada:");
    print_entry(&entry);
    Ok(())
}

pub async fn remind(patient_id: &str, config: &AppConfig) -> anyhow::Result<()> {
    PatientService::new(config)?.resend_reminder(patient_id).await?;
    println!("Lembrete reenviado.");
    Ok(())
}

async fn load(service: &PatientService, patient_id: &str) -> anyhow::Result<PatientRecord> {
    service
        .fetch_history(patient_id)
        .await?
        .ok_or_else(|| anyhow!("patient {} not found", patient_id))
}

fn print_entry(entry: &TimelineEntry) {
    let when = entry
        .timestamp()
        .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "--/--/---- --:--".to_string());
    println!("{}  {:<16} {}", when, entry.kind().as_str(), entry.summary());
}
