use anyhow::Context;
use chrono::Local;
use tracing::info;

use shared_config::AppConfig;
use upload_cell::services::validation::cell_text;
use upload_cell::{
    DraftStore, ManualEntryForm, RowValidator, UndoToken, UploadError, UploadService, ValidationSession, WizardStep,
};

use crate::cli::{ManualArgs, UploadCommand};

pub async fn run(command: UploadCommand, config: &AppConfig) -> anyhow::Result<()> {
    let store = DraftStore::from_config(config);
    let uploads = UploadService::new(config)?;

    match command {
        UploadCommand::Stage { file } => {
            let json = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let rows = ValidationSession::parse_rows(&json)?;
            let count = rows.len();
            ValidationSession::stage(&store, rows).await?;
            println!("{} registros aguardando validação.", count);
        }

        UploadCommand::Show { page } => show(store, uploads, page).await?,

        UploadCommand::Edit { row, key, value } => {
            let mut session = ValidationSession::open(store, uploads).await?;
            let stored = session.edit_cell(row_index(row)?, &key, &value).await?;
            println!("Registro {}, {} = {}", row, key, stored);
        }

        UploadCommand::Delete { row } => {
            let mut session = ValidationSession::open(store, uploads).await?;
            let token = session.delete_row(row_index(row)?).await?;
            println!("Registro {} removido. Para desfazer: carelink upload undo {}", row, token);
        }

        UploadCommand::Undo { token } => {
            let token: UndoToken = token.parse().context("invalid undo token")?;
            let mut session = ValidationSession::open(store, uploads).await?;
            let index = session.undo(token).await?;
            println!("Registro {} restaurado.", index + 1);
        }

        UploadCommand::Back => {
            ValidationSession::open(store, uploads).await?.back_to_upload().await?;
            println!("Dados pendentes descartados.");
        }

        UploadCommand::Finish => {
            let mut session = ValidationSession::open(store, uploads).await?;
            match session.finish().await {
                Ok(saved) => {
                    info!("Upload finalized with {} rows", saved.len());
                    println!("{} registros enviados.", saved.len());
                }
                Err(UploadError::MissingFields(cells)) => {
                    eprintln!("Preencha os campos obrigatórios:");
                    for cell in &cells {
                        eprintln!("  {}", cell);
                    }
                    return Err(UploadError::MissingFields(cells).into());
                }
                Err(e) => return Err(e.into()),
            }
        }

        UploadCommand::Manual(args) => {
            let form = manual_form(args)?;
            let saved = form.submit(&uploads, Local::now().date_naive()).await?;
            println!("Agendamento enviado ({} registro).", saved.len());
        }
    }
    Ok(())
}

async fn show(store: DraftStore, uploads: UploadService, page: usize) -> anyhow::Result<()> {
    let has_pending = store.load_pending().await?.is_some();
    let finalized = store.load_finalized().await?;
    let step = WizardStep::from_drafts(has_pending, finalized.is_some());
    println!("Etapa {}", step);

    match step {
        WizardStep::Upload => println!("Nenhum dado pendente. Use `carelink upload stage <arquivo>`."),
        WizardStep::Finalize => {
            let rows = finalized.unwrap_or_default();
            println!("{} registros finalizados.", rows.len());
        }
        WizardStep::Validate => {
            let session = ValidationSession::open(store, uploads).await?;
            let validator = RowValidator::new();
            let headers = session.headers();
            let page = session.page(page);

            println!("Página {} de {}", page.number, page.total_pages);
            for (offset, row) in page.rows.iter().enumerate() {
                println!("Registro {}", page.start_index + offset + 1);
                for key in &headers {
                    let value = row.get(key).map(cell_text).unwrap_or_default();
                    let flag = if RowValidator::is_invalid(key, row.get(key)) { " *" } else { "" };
                    println!("  {:<28} {}{}", validator.format_header(key), value, flag);
                }
            }
        }
    }
    Ok(())
}

/// Rows are numbered from 1 on the command line.
fn row_index(row: usize) -> anyhow::Result<usize> {
    row.checked_sub(1).ok_or_else(|| UploadError::RowOutOfRange(row).into())
}

fn manual_form(args: ManualArgs) -> Result<ManualEntryForm, UploadError> {
    let mut form = ManualEntryForm {
        appointment_date: args.date,
        appointment_time: args.time,
        patient_name: args.patient,
        birth_date: args.birth_date.unwrap_or_default(),
        companion_name: args.companion.unwrap_or_default(),
        doctor_name: args.doctor,
        specialty: args.specialty,
        notes: args.notes.unwrap_or_default(),
        ..Default::default()
    };
    form.set_patient_phone(&args.phone);
    if let Some(phone) = &args.companion_phone {
        form.set_companion_phone(phone);
    }
    if let Some(cep) = &args.cep {
        form.set_cep(cep);
    }
    if let Some(code) = &args.code {
        form.set_code(code)?;
    }
    if let Some(affinity) = &args.affinity {
        form.set_digital_affinity(affinity)?;
    }
    Ok(form)
}
