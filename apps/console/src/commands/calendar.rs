use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDateTime, Timelike};
use tracing::info;

use appointment_cell::{
    AgendaService, AppointmentStatus, CalendarError, CalendarEvent, CalendarState, EventForm, Modality,
};
use shared_config::AppConfig;
use shared_utils::dates;

use crate::cli::{CalendarCommand, EventArgs, PeriodArgs};
use crate::commands::parse_day;

pub async fn run(command: CalendarCommand, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        CalendarCommand::List { period, hidden } => {
            let mut calendar = open(&period, config).await?;
            for id in &hidden {
                if !calendar.toggle_category(id, false) {
                    eprintln!("Categoria desconhecida ignorada: {}", id);
                }
            }

            let (start, end) = calendar.visible_range();
            println!("{} a {}", dates::format_br_date(start), dates::format_br_date(end));
            let visible = calendar.visible_events();
            if visible.is_empty() {
                println!("Nenhum agendamento no período.");
            }
            for event in visible {
                print_event(event);
            }
        }

        CalendarCommand::Create { event } => {
            let mut form = EventForm::empty(now_to_minute());
            apply(&mut form, &event)?;

            let mut calendar = CalendarState::new(AgendaService::new(config)?, form.start.date());
            let created = calendar.create_event(&form).await?;
            info!("Created appointment {}", created.id);
            print_event(&created);
        }

        CalendarCommand::Update { id, period, event } => {
            let mut calendar = open(&period, config).await?;
            let current = calendar
                .event(&id)
                .ok_or_else(|| CalendarError::EventNotFound(id.clone()))?;
            let mut form = EventForm::from_event(current);
            apply(&mut form, &event)?;

            let updated = calendar.update_event(&id, &form).await?;
            print_event(&updated);
        }

        CalendarCommand::Move { id, period, to, start, end } => {
            let mut calendar = open(&period, config).await?;
            let day = parse_day(&to)?;
            let start = dates::parse_time(&start).ok_or_else(|| anyhow!("invalid time: {}", start))?;
            let end = dates::parse_time(&end).ok_or_else(|| anyhow!("invalid time: {}", end))?;

            let moved = calendar.move_event(&id, day.and_time(start), day.and_time(end)).await?;
            print_event(&moved);
        }

        CalendarCommand::Delete { id, period } => {
            let mut calendar = open(&period, config).await?;
            calendar.delete_event(&id).await?;
            println!("Agendamento {} removido.", id);
        }
    }
    Ok(())
}

/// Calendar focused on the requested period, with its events loaded.
async fn open(period: &PeriodArgs, config: &AppConfig) -> anyhow::Result<CalendarState<AgendaService>> {
    let mut calendar = CalendarState::new(AgendaService::new(config)?, Local::now().date_naive());
    if let Some(date) = &period.date {
        calendar.jump_to_day(parse_day(date)?);
    }
    calendar.set_view(period.view.into());

    calendar.load_period().await.context("loading appointments")?;
    Ok(calendar)
}

fn apply(form: &mut EventForm, args: &EventArgs) -> anyhow::Result<()> {
    if let Some(day) = &args.day {
        let day = parse_day(day)?;
        form.start = day.and_time(form.start.time());
        form.end = day.and_time(form.end.time());
    }
    if let Some(start) = &args.start {
        form.set_start_time(start)?;
    }
    if let Some(end) = &args.end {
        form.set_end_time(end)?;
    }
    if let Some(title) = &args.title {
        form.title = title.clone();
    }
    if let Some(patient) = &args.patient {
        form.patient_name = patient.clone();
    }
    if let Some(professional) = &args.professional {
        form.professional_name = professional.clone();
    }
    if let Some(category) = &args.category {
        form.set_category(category);
    }
    if let Some(status) = &args.status {
        form.set_status(Some(status.parse::<AppointmentStatus>()?));
    }
    // After status, which clears the modality
    if let Some(modality) = &args.modality {
        form.modality = Some(modality.parse::<Modality>()?);
    }
    if let Some(notes) = &args.notes {
        form.notes = notes.clone();
    }
    Ok(())
}

fn now_to_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0).and_then(|n| n.with_nanosecond(0)).unwrap_or(now)
}

fn print_event(event: &CalendarEvent) {
    let status = event.props.status.map(|s| s.to_string()).unwrap_or_default();
    println!(
        "{:<16} {} {}-{}  {}  [{}] {}",
        event.id,
        dates::format_br_date(event.start.date()),
        dates::format_time(event.start.time()),
        dates::format_time(event.end.time()),
        event.title,
        event.props.category,
        status,
    );
}
