use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::sheet::EmployeeRecord;
use crate::auth::password;
use crate::db;
use crate::db::users::ProfileUpdate;
use crate::models::{EventType, Role};

#[derive(Debug, Clone, Serialize)]
pub struct Provisioned {
    pub uid: Uuid,
    pub email: String,
    /// False when the account already existed and only its profile changed.
    pub created: bool,
}

#[derive(Debug)]
pub struct ProvisionError {
    pub message: String,
}

impl std::fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for ProvisionError {
    fn from(message: String) -> Self {
        ProvisionError { message }
    }
}

impl From<sqlx::Error> for ProvisionError {
    fn from(err: sqlx::Error) -> Self {
        let message = match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                "An account with this cedula already exists".to_string()
            }
            other => {
                tracing::error!("Provisioning failed: {other}");
                "Internal server error".to_string()
            }
        };
        ProvisionError { message }
    }
}

/// Creates or refreshes the account behind one employee record.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn provision(&self, record: &EmployeeRecord) -> Result<Provisioned, ProvisionError>;
}

pub struct PgProvisioner {
    pool: PgPool,
    email_domain: String,
}

impl PgProvisioner {
    pub fn new(pool: PgPool, email_domain: impl Into<String>) -> Self {
        Self {
            pool,
            email_domain: email_domain.into(),
        }
    }
}

pub fn birthday_title(name: &str) -> String {
    format!("Cumpleaños de {name}")
}

#[async_trait]
impl Provisioner for PgProvisioner {
    async fn provision(&self, record: &EmployeeRecord) -> Result<Provisioned, ProvisionError> {
        let email = format!("{}@{}", record.cedula, self.email_domain);

        let profile = ProfileUpdate {
            name: record.nombre.clone(),
            position: record.posicion.clone(),
            contact_email: record.correo.clone(),
            birth_date: record.fecha_nacimiento,
            hire_date: record.fecha_ingreso,
            extra: serde_json::Value::Object(record.extra.clone()),
        };

        let existing = db::users::find_by_email(&self.pool, &email).await?;

        let mut tx = self.pool.begin().await?;

        let (user, created) = match existing {
            Some(user) => {
                if user.self_registered && user.role == Role::User {
                    let pw_hash = password::hash(&record.cedula)?;
                    db::users::reclaim(&mut *tx, user.id, &pw_hash).await?;
                    tracing::warn!(
                        "Reset password of self-registered account {} for cedula {}",
                        user.id,
                        record.cedula
                    );
                }
                let user = db::users::update_profile(&mut *tx, user.id, &profile).await?;
                (user, false)
            }
            None => {
                let pw_hash = password::hash(&record.cedula)?;
                let user = db::users::create(
                    &mut *tx,
                    &record.cedula,
                    &email,
                    &pw_hash,
                    Role::User,
                    false,
                    &profile,
                )
                .await?;
                (user, true)
            }
        };

        if let Some(birth_date) = user.birth_date {
            if !db::calendar_events::has_birthday(&mut *tx, user.id).await? {
                db::calendar_events::create(
                    &mut *tx,
                    &db::calendar_events::NewEvent {
                        title: birthday_title(&user.name),
                        description: None,
                        event_date: birth_date,
                        event_type: EventType::Birthday,
                        media_url: None,
                        user_id: Some(user.id),
                    },
                )
                .await?;
            }
        }

        tx.commit().await?;

        if created {
            tracing::info!("Created account {} for cedula {}", user.id, record.cedula);
        } else {
            tracing::info!("Updated profile of {} for cedula {}", user.id, record.cedula);
        }

        Ok(Provisioned {
            uid: user.id,
            email,
            created,
        })
    }
}
