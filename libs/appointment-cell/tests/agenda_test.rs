// libs/appointment-cell/tests/agenda_test.rs
use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::AppointmentStatus;
use appointment_cell::{AgendaService, AppointmentGateway, CalendarError, CalendarState, EventForm};
use shared_models::AppError;
use shared_utils::test_utils::{MockApiResponses, TestConfig};

// ==============================================================================
// TEST FIXTURES
// ==============================================================================

struct TestSetup {
    mock_server: MockServer,
    service: AgendaService,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_server(&mock_server.uri()).to_app_config();
        let service = AgendaService::new(&config).expect("client should build");

        Self { mock_server, service }
    }

    async fn mount_week(&self) {
        Mock::given(method("GET"))
            .and(path("/agendamentos"))
            .and(query_param("dataInicio", "2025-11-02"))
            .and(query_param("dataFim", "2025-11-08"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                MockApiResponses::appointment_record(10, "Cardiologia", "Maria Souza"),
                MockApiResponses::appointment_record(11, "Fonoaudiologia", ""),
            ])))
            .mount(&self.mock_server)
            .await;
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==============================================================================
// SERVICE TESTS
// ==============================================================================

#[tokio::test]
async fn test_fetch_events_maps_records() {
    let setup = TestSetup::new().await;
    setup.mount_week().await;

    let events = setup
        .service
        .fetch_events(date(2025, 11, 2), date(2025, 11, 8))
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "10");
    assert_eq!(events[0].title, "Cardiologia - Maria Souza");
    assert_eq!(events[0].color, "#dc2626");
    assert_eq!(events[0].props.status, Some(AppointmentStatus::Agendada));
    assert_eq!(events[0].start.to_string(), "2025-11-03 08:30:00");
    assert_eq!(events[0].end.to_string(), "2025-11-03 09:30:00");
    assert_eq!(events[1].title, "Fonoaudiologia - Paciente");
    assert_eq!(events[1].color, "#9333ea");
}

#[tokio::test]
async fn test_unknown_fields_survive_update() {
    let setup = TestSetup::new().await;
    setup.mount_week().await;

    Mock::given(method("PUT"))
        .and(path("/agendamentos/10"))
        .and(body_partial_json(json!({
            "id": 10,
            "codigoConsulta": 1234,
            "horaConsulta": "14:00"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10,
            "dataConsulta": "03/11/2025",
            "horaConsulta": "14:00",
            "nomePaciente": "Maria Souza",
            "especialidadeProfissional": "Cardiologia"
        })))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let mut state = CalendarState::new(setup.service, date(2025, 11, 3));
    state.load_period().await.unwrap();

    let start = date(2025, 11, 3).and_hms_opt(14, 0, 0).unwrap();
    let end = date(2025, 11, 3).and_hms_opt(15, 0, 0).unwrap();
    let moved = state.move_event("10", start, end).await.unwrap();

    assert_eq!(moved.start, start);
}

#[tokio::test]
async fn test_create_posts_form() {
    let setup = TestSetup::new().await;

    Mock::given(method("POST"))
        .and(path("/agendamentos"))
        .and(body_partial_json(json!({
            "titulo": "Primeira consulta",
            "dataConsulta": "05/11/2025",
            "horaConsulta": "10:00",
            "fimConsulta": "2025-11-05T10:40:00",
            "especialidadeProfissional": "Neurologia",
            "status": "Agendada",
            "cor": "#7c3aed"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 501,
            "titulo": "Primeira consulta",
            "dataConsulta": "05/11/2025",
            "horaConsulta": "10:00",
            "fimConsulta": "2025-11-05T10:40:00",
            "nomePaciente": "João",
            "nomeProfissional": "Dr. Ricardo",
            "especialidadeProfissional": "Neurologia",
            "status": "Agendada"
        })))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let mut state = CalendarState::new(setup.service, date(2025, 11, 3));
    let mut form = EventForm::from_slot(
        date(2025, 11, 5).and_hms_opt(10, 0, 0).unwrap(),
        date(2025, 11, 5).and_hms_opt(11, 0, 0).unwrap(),
    );
    form.title = "Primeira consulta".into();
    form.patient_name = "João".into();
    form.professional_name = "Dr. Ricardo".into();
    form.set_category("Neurologia");
    form.set_status(Some(AppointmentStatus::Agendada));
    form.set_end_time("10:40").unwrap();

    let created = state.create_event(&form).await.unwrap();
    assert_eq!(created.id, "501");
    assert_eq!(state.events().len(), 1);
}

#[tokio::test]
async fn test_empty_create_response_keeps_local_event() {
    let setup = TestSetup::new().await;

    Mock::given(method("POST"))
        .and(path("/agendamentos"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&setup.mock_server)
        .await;

    let mut state = CalendarState::new(setup.service, date(2025, 11, 3));
    let mut form = EventForm::from_slot(
        date(2025, 11, 5).and_hms_opt(10, 0, 0).unwrap(),
        date(2025, 11, 5).and_hms_opt(11, 0, 0).unwrap(),
    );
    form.title = "Retorno".into();
    form.patient_name = "João".into();
    form.professional_name = "Dr. Ricardo".into();
    form.set_category("Urologia");
    form.set_status(Some(AppointmentStatus::Agendada));

    let created = state.create_event(&form).await.unwrap();
    assert!(created.is_local());
    assert_eq!(created.start, form.start);
}

#[tokio::test]
async fn test_delete_hits_item_path() {
    let setup = TestSetup::new().await;

    Mock::given(method("DELETE"))
        .and(path("/agendamentos/abc%201"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    setup.service.delete("abc 1").await.unwrap();
}

#[tokio::test]
async fn test_server_error_rolls_back_delete() {
    let setup = TestSetup::new().await;
    setup.mount_week().await;

    Mock::given(method("DELETE"))
        .and(path("/agendamentos/11"))
        .respond_with(ResponseTemplate::new(500).set_body_string("falha"))
        .mount(&setup.mock_server)
        .await;

    let mut state = CalendarState::new(setup.service, date(2025, 11, 3));
    state.load_period().await.unwrap();

    let result = state.delete_event("11").await;
    assert_matches!(result, Err(CalendarError::Api(AppError::Api { status: 500, .. })));
    assert_eq!(state.events().len(), 2);
    assert_eq!(state.events()[1].id, "11");
}
