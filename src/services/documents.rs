use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploaded,
    Analyzed,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub id: u32,
    pub name: String,
    pub size_kb: u64,
    pub status: DocumentStatus,
    pub uploaded_at: String,
}

/// In-memory document listing backing the dashboard. Seeded with the demo
/// records; every analyzed workbook is appended. Nothing is persisted.
pub struct DocumentStore {
    documents: RwLock<Vec<DocumentRecord>>,
}

impl DocumentStore {
    pub fn with_demo_documents() -> Self {
        let seeded = vec![
            DocumentRecord {
                id: 1,
                name: "ventas_q1.xlsx".to_string(),
                size_kb: 248,
                status: DocumentStatus::Analyzed,
                uploaded_at: "2026-05-12T09:30:00Z".to_string(),
            },
            DocumentRecord {
                id: 2,
                name: "informe_costos.xlsx".to_string(),
                size_kb: 512,
                status: DocumentStatus::Analyzed,
                uploaded_at: "2026-06-03T14:05:00Z".to_string(),
            },
            DocumentRecord {
                id: 3,
                name: "clientes_2026.xlsx".to_string(),
                size_kb: 96,
                status: DocumentStatus::Uploaded,
                uploaded_at: "2026-07-21T11:45:00Z".to_string(),
            },
        ];
        Self {
            documents: RwLock::new(seeded),
        }
    }

    pub fn add(&self, name: &str, size_kb: u64, status: DocumentStatus) -> DocumentRecord {
        let mut documents = self.documents.write();
        let record = DocumentRecord {
            id: documents.len() as u32 + 1,
            name: name.to_string(),
            size_kb,
            status,
            uploaded_at: Utc::now().to_rfc3339(),
        };
        documents.push(record.clone());
        record
    }

    pub fn list(&self) -> Vec<DocumentRecord> {
        self.documents.read().clone()
    }

    /// (total, analyzed) counts for the stat cards.
    pub fn counts(&self) -> (usize, usize) {
        let documents = self.documents.read();
        let analyzed = documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Analyzed)
            .count();
        (documents.len(), analyzed)
    }
}
