// libs/upload-cell/tests/upload_test.rs
use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use upload_cell::{
    CellRef, DraftStore, ManualEntryForm, UploadError, UploadRow, UploadService, ValidationSession, WizardStep,
};
use shared_utils::test_utils::{MockApiResponses, TestConfig};

// ==============================================================================
// TEST FIXTURES
// ==============================================================================

struct TestSetup {
    mock_server: MockServer,
    store: DraftStore,
    uploads: UploadService,
    _dir: TempDir,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("temp dir");

        let mut config = TestConfig::with_server(&mock_server.uri());
        config.draft_dir = dir.path().to_path_buf();
        let app_config = config.to_app_config();

        Self {
            store: DraftStore::from_config(&app_config),
            uploads: UploadService::new(&app_config).expect("client should build"),
            mock_server,
            _dir: dir,
        }
    }

    async fn staged_session(&self, rows: serde_json::Value) -> ValidationSession {
        let rows: Vec<UploadRow> = serde_json::from_value(rows).unwrap();
        ValidationSession::stage(&self.store, rows).await.unwrap();
        ValidationSession::open(self.store.clone(), self.uploads.clone())
            .await
            .unwrap()
    }

    async fn mount_save(&self, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/upload/salvar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::upload_rows()))
            .expect(expected_calls)
            .mount(&self.mock_server)
            .await;
    }
}

// ==============================================================================
// VALIDATION FLOW
// ==============================================================================

#[tokio::test]
async fn test_open_without_pending_rows() {
    let setup = TestSetup::new().await;
    let result = ValidationSession::open(setup.store.clone(), setup.uploads.clone()).await;
    assert_matches!(result, Err(UploadError::NothingToValidate));
}

#[tokio::test]
async fn test_finish_saves_and_clears_pending() {
    let setup = TestSetup::new().await;
    setup.mount_save(1).await;
    let mut session = setup.staged_session(MockApiResponses::upload_rows()).await;

    let saved = session.finish().await.unwrap();

    assert_eq!(saved.len(), 2);
    assert_eq!(setup.store.load_pending().await.unwrap(), None);
    assert_eq!(setup.store.load_finalized().await.unwrap().map(|r| r.len()), Some(2));
}

#[tokio::test]
async fn test_finish_succeeds_when_finalized_draft_cannot_be_written() {
    let setup = TestSetup::new().await;
    setup.mount_save(1).await;
    let mut session = setup.staged_session(MockApiResponses::upload_rows()).await;

    // A directory in place of the finalized file makes that write fail.
    tokio::fs::create_dir_all(setup.store.dir().join("patientData.json"))
        .await
        .unwrap();

    let saved = session.finish().await.unwrap();

    assert_eq!(saved.len(), 2);
    assert_eq!(setup.store.load_pending().await.unwrap(), None);
}

#[tokio::test]
async fn test_finish_with_blank_required_cell_sends_nothing() {
    let setup = TestSetup::new().await;
    setup.mount_save(0).await;
    let mut session = setup
        .staged_session(json!([
            { "nomePaciente": "Maria", "especialidade": "Cardiologia", "nomeAcompanhante": "" },
            { "nomePaciente": "  ", "especialidade": "Neurologia" }
        ]))
        .await;

    let result = session.finish().await;

    assert_matches!(result, Err(UploadError::MissingFields(cells)) if cells == vec![CellRef::new(1, "nomePaciente")]);
    assert!(setup.store.load_pending().await.unwrap().is_some());
}

#[tokio::test]
async fn test_edit_cell_masks_and_clears_error() {
    let setup = TestSetup::new().await;
    setup.mount_save(1).await;
    let mut session = setup
        .staged_session(json!([{ "nomePaciente": "", "numeroPaciente": "", "dataAgendamento": "" }]))
        .await;

    assert!(session.finish().await.is_err());
    assert_eq!(session.errors().len(), 3);

    assert_eq!(session.edit_cell(0, "numeroPaciente", "11912345678").await.unwrap(), "(11) 91234-5678");
    assert_eq!(session.edit_cell(0, "dataAgendamento", "03112025").await.unwrap(), "03/11/2025");
    session.edit_cell(0, "nomePaciente", "Maria").await.unwrap();
    assert!(session.errors().is_empty());

    // Edits are persisted as they happen.
    let pending = setup.store.load_pending().await.unwrap().unwrap();
    assert_eq!(pending[0]["numeroPaciente"], "(11) 91234-5678");

    session.finish().await.unwrap();
}

#[tokio::test]
async fn test_delete_and_undo_restore_original_index() {
    let setup = TestSetup::new().await;
    let mut session = setup
        .staged_session(json!([
            { "nomePaciente": "A" },
            { "nomePaciente": "B" },
            { "nomePaciente": "C" }
        ]))
        .await;

    let token = session.delete_row(1).await.unwrap();
    assert_eq!(session.rows().len(), 2);
    assert_eq!(setup.store.load_pending().await.unwrap().map(|r| r.len()), Some(2));

    // A fresh session, as the CLI would open, can still undo.
    let mut reopened = ValidationSession::open(setup.store.clone(), setup.uploads.clone())
        .await
        .unwrap();
    assert_eq!(reopened.undo(token).await.unwrap(), 1);

    let names: Vec<&str> = reopened.rows().iter().map(|r| r["nomePaciente"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_matches!(reopened.undo(token).await, Err(UploadError::UnknownUndo(_)));
    assert_matches!(reopened.delete_row(9).await, Err(UploadError::RowOutOfRange(9)));
}

#[tokio::test]
async fn test_pagination() {
    let setup = TestSetup::new().await;
    let rows: Vec<serde_json::Value> = (0..12).map(|i| json!({ "nomePaciente": format!("P{}", i) })).collect();
    let session = setup.staged_session(json!(rows)).await;

    assert_eq!(session.total_pages(), 3);
    let page = session.page(3);
    assert_eq!(page.start_index, 10);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(session.page(0).number, 1);
    assert_eq!(session.page(99).number, 3);
}

#[tokio::test]
async fn test_back_to_upload_clears_pending() {
    let setup = TestSetup::new().await;
    let session = setup.staged_session(MockApiResponses::upload_rows()).await;

    session.back_to_upload().await.unwrap();

    assert_eq!(setup.store.load_pending().await.unwrap(), None);
    assert_eq!(WizardStep::from_drafts(false, false), WizardStep::Upload);
}

// ==============================================================================
// MANUAL ENTRY
// ==============================================================================

#[tokio::test]
async fn test_manual_submit_posts_single_row() {
    let setup = TestSetup::new().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/salvar"))
        .and(body_json(json!([{
            "nomeMedico": "Dr. Ricardo Lima",
            "dataAgendamento": "03/11/2025",
            "horaAgendamento": "09:00",
            "nomePaciente": "João Pereira",
            "numeroPaciente": "11977771111",
            "dataNascimentoPaciente": "",
            "afinidadeDigital": 3,
            "nomeAcompanhante": "",
            "numeroAcompanhante": "",
            "especialidade": "Neurologia",
            "codigoConsulta": 0,
            "obsAgendamento": "",
            "cep": "01310100"
        }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let mut form = ManualEntryForm {
        appointment_date: "2025-11-03".into(),
        appointment_time: "09:00".into(),
        patient_name: "João Pereira".into(),
        doctor_name: "Dr. Ricardo Lima".into(),
        specialty: "Neurologia".into(),
        ..Default::default()
    };
    form.set_patient_phone("11977771111");
    form.set_cep("01310100");
    form.set_digital_affinity("3").unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    let saved = form.submit(&setup.uploads, today).await.unwrap();
    assert_eq!(saved.len(), 1);
}

#[tokio::test]
async fn test_invalid_manual_form_sends_nothing() {
    let setup = TestSetup::new().await;
    setup.mount_save(0).await;

    let form = ManualEntryForm::default();
    let today = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    assert_matches!(form.submit(&setup.uploads, today).await, Err(UploadError::InvalidForm(_)));
}
