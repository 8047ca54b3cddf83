use std::path::PathBuf;
use std::sync::Arc;
use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub api_base_url: String,
    pub agenda_api_url: String,
    pub draft_dir: PathBuf,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            agenda_api_url: "http://localhost:8080".to_string(),
            draft_dir: std::env::temp_dir().join("carelink-test"),
        }
    }
}

impl TestConfig {
    /// Points both API base URLs at one mock server.
    pub fn with_server(uri: &str) -> Self {
        Self {
            api_base_url: uri.to_string(),
            agenda_api_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            agenda_api_url: self.agenda_api_url.clone(),
            alert_poll_interval_secs: 1,
            request_timeout_secs: 5,
            staff_user_id: "1".to_string(),
            staff_user_name: "Gustavo".to_string(),
            chat_user_id: "funcionario_001".to_string(),
            draft_dir: self.draft_dir.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockApiResponses;

impl MockApiResponses {
    pub fn appointment_record(id: i64, specialty: &str, patient: &str) -> Value {
        json!({
            "id": id,
            "dataConsulta": "03/11/2025",
            "horaConsulta": "08:30",
            "nomePaciente": patient,
            "numeroPaciente": "11912345678",
            "nomeProfissional": "Dra. Helena Prado",
            "especialidadeProfissional": specialty,
            "status": "Agendada",
            "anotacoes": "",
            "codigoConsulta": 1234
        })
    }

    pub fn risk_alert(patient_id: &str, name: &str, score: u32, level: &str) -> Value {
        json!({
            "idPaciente": patient_id,
            "nomePaciente": name,
            "telefonePaciente": "(11) 91234-5678",
            "scoreDeRisco": score,
            "nivelDeRisco": level,
            "horaConsulta": "09:00",
            "nomeMedico": "Ricardo Lima",
            "especialidadeConsulta": "Cardiologia"
        })
    }

    pub fn patient_record(patient_id: &str) -> Value {
        json!({
            "idPaciente": patient_id,
            "nome": "Maria Aparecida Souza",
            "telefone": "(11) 98888-7777",
            "bairro": "Vila Mariana",
            "dataNascimento": "12/04/1958",
            "scoreDeRisco": 780,
            "nivelDeRisco": "ALTO",
            "linhaDoTempo": [
                {
                    "id": "c-1",
                    "tipo": "CONSULTA",
                    "data": "10/09/2025",
                    "hora": "10:00",
                    "especialidade": "Cardiologia",
                    "nomeMedico": "Ricardo Lima",
                    "status": "Paciente Faltou"
                },
                {
                    "id": "a-1",
                    "tipo": "ANOTACAO_EQUIPE",
                    "data": "12/09/2025",
                    "hora": "14:30:00",
                    "anotacao": "Paciente pediu remarcação",
                    "idUsuario": "1",
                    "nomeUsuario": "Gustavo"
                },
                {
                    "id": "al-1",
                    "tipo": "ALERTA",
                    "data": "01/09/2025",
                    "hora": "08:00",
                    "mensagem": "Risco alto de falta",
                    "scoreDeRisco": 780
                }
            ]
        })
    }

    pub fn upload_rows() -> Value {
        json!([
            {
                "dataAgendamento": "03/11/2025",
                "horaAgendamento": "08:30",
                "nomePaciente": "Maria Souza",
                "numeroPaciente": "(11) 91234-5678",
                "nomeAcompanhante": "",
                "especialidade": "Cardiologia"
            },
            {
                "dataAgendamento": "03/11/2025",
                "horaAgendamento": "09:30",
                "nomePaciente": "João Pereira",
                "numeroPaciente": "(11) 97777-1111",
                "nomeAcompanhante": "Ana Pereira",
                "especialidade": "Neurologia"
            }
        ])
    }

    pub fn chat_response(text: &str) -> Value {
        json!({ "response": text })
    }
}
