use clap::{Args, Parser, Subcommand, ValueEnum};

use appointment_cell::CalendarView;

#[derive(Parser)]
#[command(name = "carelink", version, about = "CareLink clinic staff console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Appointment calendar
    #[command(subcommand)]
    Calendar(CalendarCommand),

    /// Today's absenteeism risk dashboard
    Dashboard {
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
    },

    /// Patient history and timeline
    History {
        patient_id: String,
        /// todos, anotacao_equipe, consulta or alerta
        #[arg(long, default_value = "todos")]
        filter: String,
        /// recente or antiga
        #[arg(long, default_value = "recente")]
        sort: String,
    },

    /// Add a staff annotation to a patient's timeline
    Annotate { patient_id: String, text: String },

    /// Resend the appointment reminder to a patient
    Remind { patient_id: String },

    /// Upload, validate and finalize appointment data
    #[command(subcommand)]
    Upload(UploadCommand),

    /// Ask the staff assistant; interactive when no message is given
    Chat { message: Option<String> },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Month,
    Week,
    Day,
}

impl From<ViewArg> for CalendarView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Month => CalendarView::Month,
            ViewArg::Week => CalendarView::Week,
            ViewArg::Day => CalendarView::Day,
        }
    }
}

/// Which period to load before acting on an event.
#[derive(Args)]
pub struct PeriodArgs {
    /// Any day inside the period, yyyy-mm-dd or dd/mm/yyyy (default: today)
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, value_enum, default_value = "week")]
    pub view: ViewArg,
}

#[derive(Args, Default)]
pub struct EventArgs {
    #[arg(long)]
    pub title: Option<String>,
    /// Day of the appointment, yyyy-mm-dd or dd/mm/yyyy
    #[arg(long = "on")]
    pub day: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub start: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub patient: Option<String>,
    #[arg(long)]
    pub professional: Option<String>,
    /// Specialty title from the catalog
    #[arg(long)]
    pub category: Option<String>,
    /// Agendada, Realizada, Paciente Faltou or Cancelada
    #[arg(long)]
    pub status: Option<String>,
    /// Presencial or Teleconsulta
    #[arg(long)]
    pub modality: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum CalendarCommand {
    /// List the events of a period
    List {
        #[command(flatten)]
        period: PeriodArgs,
        /// Hide a category by catalog id; repeatable
        #[arg(long = "hide")]
        hidden: Vec<String>,
    },
    Create {
        #[command(flatten)]
        event: EventArgs,
    },
    Update {
        id: String,
        #[command(flatten)]
        period: PeriodArgs,
        #[command(flatten)]
        event: EventArgs,
    },
    /// Reschedule an event
    Move {
        id: String,
        #[command(flatten)]
        period: PeriodArgs,
        /// New day, yyyy-mm-dd or dd/mm/yyyy
        #[arg(long)]
        to: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    Delete {
        id: String,
        #[command(flatten)]
        period: PeriodArgs,
    },
}

#[derive(Subcommand)]
pub enum UploadCommand {
    /// Stage a JSON array of spreadsheet rows for validation
    Stage { file: std::path::PathBuf },
    /// Show the current wizard step and a page of rows
    Show {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Set a cell; rows are numbered from 1
    Edit { row: usize, key: String, value: String },
    Delete { row: usize },
    Undo { token: String },
    /// Discard the pending rows and go back to the upload step
    Back,
    /// Validate and send all pending rows
    Finish,
    /// Send a single appointment typed in by hand
    Manual(ManualArgs),
}

#[derive(Args)]
pub struct ManualArgs {
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub time: String,
    #[arg(long)]
    pub patient: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub doctor: String,
    #[arg(long)]
    pub specialty: String,
    #[arg(long)]
    pub birth_date: Option<String>,
    #[arg(long)]
    pub companion: Option<String>,
    #[arg(long)]
    pub companion_phone: Option<String>,
    #[arg(long)]
    pub affinity: Option<String>,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub cep: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_calendar_move() {
        let cli = Cli::try_parse_from([
            "carelink", "calendar", "move", "17", "--date", "2025-11-03", "--to", "04/11/2025", "--start", "09:00",
            "--end", "10:00",
        ])
        .unwrap();

        match cli.command {
            Command::Calendar(CalendarCommand::Move { id, period, to, .. }) => {
                assert_eq!(id, "17");
                assert_eq!(period.date.as_deref(), Some("2025-11-03"));
                assert_eq!(CalendarView::from(period.view), CalendarView::Week);
                assert_eq!(to, "04/11/2025");
            }
            _ => panic!("expected calendar move"),
        }
    }

    #[test]
    fn test_parse_history_defaults() {
        let cli = Cli::try_parse_from(["carelink", "history", "42"]).unwrap();
        match cli.command {
            Command::History { patient_id, filter, sort } => {
                assert_eq!(patient_id, "42");
                assert_eq!(filter, "todos");
                assert_eq!(sort, "recente");
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_parse_upload_edit() {
        let cli = Cli::try_parse_from(["carelink", "upload", "edit", "2", "numeroPaciente", "11912345678"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Upload(UploadCommand::Edit { row: 2, ref key, .. }) if key == "numeroPaciente"
        ));
    }
}
