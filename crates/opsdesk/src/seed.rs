//! idempotent provisioning: roles, features, privileges, reference data and
//! the first administrative user.
//!
//! safe to run repeatedly - every insert is keyed by a unique name and
//! skipped when the row already exists.

use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, Set};
use tracing::info;

use opsdesk_db::Db;
use opsdesk_db::entity::{currencies, features, phases, priorities, privileges, roles, stages, users};
use opsdesk_types::{Config, Error, Result};

/// run the full provisioning pass.
pub async fn run(db: &Db, config: &Config) -> Result<()> {
    seed_roles(db).await?;
    seed_features(db).await?;
    seed_privileges(db).await?;
    seed_phases(db).await?;
    seed_priorities(db).await?;
    seed_stages(db).await?;
    seed_currencies(db).await?;
    seed_admin(db, config).await?;
    Ok(())
}

async fn seed_roles(db: &Db) -> Result<()> {
    let wanted = [
        ("Super Admin", "A super user that can do everything"),
        (
            "Admin",
            "An admin user that can do everything except RBAC modules",
        ),
        (
            "Operator",
            "An operator without access to RBAC and user modules",
        ),
    ];
    for (name, description) in wanted {
        let exists = db
            .find_first::<roles::Entity>(Condition::all().add(roles::Column::Name.eq(name)))
            .await?
            .is_some();
        if exists {
            continue;
        }
        let now = Utc::now();
        db.insert(roles::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            status: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .await?;
        info!(role = name, "seeded role");
    }
    Ok(())
}

struct FeatureSeed {
    name: &'static str,
    description: &'static str,
    create: bool,
    read: bool,
    update: bool,
    delete: bool,
}

const fn full(name: &'static str, description: &'static str) -> FeatureSeed {
    FeatureSeed {
        name,
        description,
        create: true,
        read: true,
        update: true,
        delete: true,
    }
}

const fn read_only(name: &'static str, description: &'static str) -> FeatureSeed {
    FeatureSeed {
        name,
        description,
        create: false,
        read: true,
        update: false,
        delete: false,
    }
}

fn feature_catalogue() -> Vec<FeatureSeed> {
    vec![
        read_only("dashboard", "Overview panel only. No action needed."),
        full("features", "Manage features"),
        full("privileges", "Set feature access per role"),
        full("roles", "Manage access roles"),
        full("users", "Manage system users"),
        full("clients", "Manage billing clients"),
        full("stages", "Manage transaction stages"),
        full("currencies", "Manage currencies"),
        full("transactions", "Manage transactions"),
        read_only("transactionhistories", "Transaction audit trail"),
        full("priorities", "Manage task priorities"),
        full("phases", "Manage task phases"),
        full("tasks", "Manage tasks"),
        read_only("taskhistories", "Task audit trail"),
        full("events", "Manage calendar events"),
        full("schedules", "Manage schedules"),
    ]
}

async fn seed_features(db: &Db) -> Result<()> {
    for seed in feature_catalogue() {
        let exists = db
            .find_first::<features::Entity>(
                Condition::all().add(features::Column::Name.eq(seed.name)),
            )
            .await?
            .is_some();
        if exists {
            continue;
        }
        let now = Utc::now();
        db.insert(features::ActiveModel {
            name: Set(seed.name.to_string()),
            description: Set(seed.description.to_string()),
            feature_create: Set(seed.create),
            feature_read: Set(seed.read),
            feature_update: Set(seed.update),
            feature_delete: Set(seed.delete),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .await?;
        info!(feature = seed.name, "seeded feature");
    }
    Ok(())
}

const RBAC_FEATURES: [&str; 3] = ["roles", "features", "privileges"];

/// per-role privilege policy: super admins copy the feature defaults, admins
/// lose write access to the RBAC modules, operators additionally lose the
/// user module entirely.
fn privilege_bits(role: &str, feature: &features::Model) -> (bool, bool, bool, bool) {
    let defaults = (
        feature.feature_create,
        feature.feature_read,
        feature.feature_update,
        feature.feature_delete,
    );
    match role {
        "Super Admin" => defaults,
        "Admin" => {
            if RBAC_FEATURES.contains(&feature.name.as_str()) {
                (false, true, false, false)
            } else {
                defaults
            }
        }
        _ => {
            if RBAC_FEATURES.contains(&feature.name.as_str()) || feature.name == "users" {
                (false, false, false, false)
            } else {
                defaults
            }
        }
    }
}

async fn seed_privileges(db: &Db) -> Result<()> {
    let all_roles = db.find_all::<roles::Entity>(Condition::all()).await?;
    let all_features = db.find_all::<features::Entity>(Condition::all()).await?;

    for role in &all_roles {
        for feature in &all_features {
            let exists = db
                .find_first::<privileges::Entity>(
                    Condition::all()
                        .add(privileges::Column::RoleId.eq(role.id))
                        .add(privileges::Column::FeatureId.eq(feature.id)),
                )
                .await?
                .is_some();
            if exists {
                continue;
            }
            let (create, read, update, delete) = privilege_bits(&role.name, feature);
            let now = Utc::now();
            db.insert(privileges::ActiveModel {
                name: Set(uuid::Uuid::new_v4().to_string()),
                role_id: Set(role.id),
                feature_id: Set(feature.id),
                privilege_create: Set(create),
                privilege_read: Set(read),
                privilege_update: Set(update),
                privilege_delete: Set(delete),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .await?;
        }
    }
    Ok(())
}

async fn seed_phases(db: &Db) -> Result<()> {
    let wanted = [
        ("to_do", "To Do", "Dikerjakan", "Gagawin"),
        ("in_progress", "In Progress", "Sedang Berjalan", "Isinasagawa"),
        ("in_review", "In Review", "Ditinjau", "Sinusuri"),
        ("closed", "Closed", "Selesai", "Sarado"),
        ("cancelled", "Cancelled", "Dibatalkan", "Kanselado"),
    ];
    for (name, en, id_loc, ph) in wanted {
        let exists = db
            .find_first::<phases::Entity>(Condition::all().add(phases::Column::Name.eq(name)))
            .await?
            .is_some();
        if exists {
            continue;
        }
        let now = Utc::now();
        db.insert(phases::ActiveModel {
            name: Set(name.to_string()),
            name_en: Set(Some(en.to_string())),
            name_id: Set(Some(id_loc.to_string())),
            name_ph: Set(Some(ph.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .await?;
    }
    Ok(())
}

async fn seed_priorities(db: &Db) -> Result<()> {
    let wanted = [
        ("low", "Low", "Niedrig", "Laag", "Rendah", "Mababa"),
        ("medium", "Medium", "Mittel", "Gemiddeld", "Sedang", "Katamtaman"),
        ("high", "High", "Hoch", "Hoog", "Tinggi", "Mataas"),
    ];
    for (name, en, de, nl, id_loc, ph) in wanted {
        let exists = db
            .find_first::<priorities::Entity>(
                Condition::all().add(priorities::Column::Name.eq(name)),
            )
            .await?
            .is_some();
        if exists {
            continue;
        }
        let now = Utc::now();
        db.insert(priorities::ActiveModel {
            name: Set(name.to_string()),
            name_en: Set(Some(en.to_string())),
            name_de: Set(Some(de.to_string())),
            name_nl: Set(Some(nl.to_string())),
            name_id: Set(Some(id_loc.to_string())),
            name_ph: Set(Some(ph.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .await?;
    }
    Ok(())
}

async fn seed_stages(db: &Db) -> Result<()> {
    let wanted = [
        (1, "registration", "Registration", "#6B7280"),
        (2, "eligibility_check", "Eligibility Check", "#3B82F6"),
        (3, "appointment_scheduled", "Appointment Scheduled", "#0EA5E9"),
        (4, "checked_in", "Checked-in", "#10B981"),
        (5, "billed", "Billed", "#F59E0B"),
        (6, "settled", "Settled", "#22C55E"),
    ];
    for (order, name, en, color) in wanted {
        let exists = db
            .find_first::<stages::Entity>(Condition::all().add(stages::Column::Name.eq(name)))
            .await?
            .is_some();
        if exists {
            continue;
        }
        let now = Utc::now();
        db.insert(stages::ActiveModel {
            data_order: Set(Some(order)),
            name: Set(name.to_string()),
            name_en: Set(Some(en.to_string())),
            color: Set(Some(color.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .await?;
    }
    Ok(())
}

async fn seed_currencies(db: &Db) -> Result<()> {
    let wanted = [
        ("USD", "$"),
        ("IDR", "Rp"),
        ("PHP", "₱"),
        ("EUR", "€"),
        ("AUD", "$"),
        ("GBP", "£"),
    ];
    for (name, symbol) in wanted {
        let exists = db
            .find_first::<currencies::Entity>(
                Condition::all().add(currencies::Column::Name.eq(name)),
            )
            .await?
            .is_some();
        if exists {
            continue;
        }
        let now = Utc::now();
        db.insert(currencies::ActiveModel {
            name: Set(name.to_string()),
            symbol: Set(symbol.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .await?;
    }
    Ok(())
}

async fn seed_admin(db: &Db, _config: &Config) -> Result<()> {
    let email =
        std::env::var("OPSDESK_ADMIN_EMAIL").unwrap_or_else(|_| "admin@opsdesk.local".to_string());
    if db.user_by_email(&email).await?.is_some() {
        return Ok(());
    }
    let password =
        std::env::var("OPSDESK_ADMIN_PASSWORD").unwrap_or_else(|_| "admin1234".to_string());
    let role = db
        .find_first::<roles::Entity>(Condition::all().add(roles::Column::Name.eq("Super Admin")))
        .await?
        .ok_or_else(|| Error::internal("Super Admin role missing after seeding"))?;

    let now = Utc::now();
    db.insert(users::ActiveModel {
        role_id: Set(role.id),
        name: Set("Administrator".to_string()),
        email: Set(email.clone()),
        password: Set(opsdesk_auth::hash_password(&password)?),
        phone: Set("+10000000000".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    })
    .await?;
    info!(email, "seeded administrative user");
    Ok(())
}
