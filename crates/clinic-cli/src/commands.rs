use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span};

use clinic_core::{
    ClinicStats, FanoutNotifier, LifecycleManager, TracingNotifier, UserStore, admin_stats,
    dashboard, list_doctors, list_users, register, seed_sample_users,
};
use clinic_model::{Action, Appointment, NewAppointment, TimeSlot, User, UserId};
use clinic_persistence::{JsonStore, OutboxNotifier};

use crate::cli::{ActorArgs, BookArgs, DecisionArgs, DoctorsArgs, RegisterArgs, UsersArgs};
use crate::logging::redact_value;
use crate::types::{AppointmentRow, InitReport};

/// Store and notification sinks shared by every command.
pub struct AppContext {
    store: JsonStore,
    notifier: FanoutNotifier,
}

impl AppContext {
    /// Open the database at `db` and wire the notification sinks.
    ///
    /// Notifications always go to the log; with `outbox` they are also
    /// appended to that file.
    pub fn open(db: &Path, outbox: Option<&Path>, log_addresses: bool) -> Result<Self> {
        let store = JsonStore::open(db)?;
        let mut notifier =
            FanoutNotifier::new().with(TracingNotifier::new().with_addresses(log_addresses));
        if let Some(path) = outbox {
            notifier = notifier.with(OutboxNotifier::new(path));
        }
        debug!(path = %db.display(), "database opened");
        Ok(Self { store, notifier })
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    fn manager(&self) -> LifecycleManager<'_, JsonStore, FanoutNotifier> {
        LifecycleManager::new(&self.store, &self.notifier)
    }

    /// Look up the account acting on this command.
    fn resolve_actor(&self, email: &str) -> Result<User> {
        self.find_user(email)
            .with_context(|| format!("resolve account {}", redact_value(email)))
    }

    fn find_user(&self, email: &str) -> Result<User> {
        let normalized = email.trim().to_lowercase();
        self.store
            .find_user_by_email(&normalized)?
            .ok_or_else(|| anyhow!("no account is registered with that email"))
    }

    fn user_names(&self) -> Result<BTreeMap<UserId, String>> {
        Ok(self
            .store
            .users()?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect())
    }

    fn rows(&self, appointments: &[Appointment]) -> Result<Vec<AppointmentRow>> {
        let names = self.user_names()?;
        Ok(appointments
            .iter()
            .map(|appointment| AppointmentRow::new(appointment, &names))
            .collect())
    }
}

pub fn run_init_db(ctx: &AppContext) -> Result<InitReport> {
    let created = seed_sample_users(ctx.store()).context("seed sample accounts")?;
    // the file is written even when every sample account already existed
    ctx.store().flush().context("write database")?;
    let doctors = list_doctors(ctx.store(), None)?;
    info!(created = created.len(), "database initialized");
    Ok(InitReport {
        path: ctx.store().path().to_path_buf(),
        created,
        doctors,
    })
}

pub fn run_register(ctx: &AppContext, args: &RegisterArgs) -> Result<User> {
    let user = register(
        ctx.store(),
        &args.name,
        &args.email,
        args.role.into(),
        args.specialization.as_deref(),
    )
    .context("register account")?;
    Ok(user)
}

pub fn run_doctors(ctx: &AppContext, args: &DoctorsArgs) -> Result<Vec<User>> {
    let doctors = list_doctors(ctx.store(), args.specialization.as_deref())?;
    Ok(doctors)
}

pub fn run_book(ctx: &AppContext, args: &BookArgs) -> Result<AppointmentRow> {
    let span = info_span!("book", actor = %redact_value(&args.actor.actor));
    let _guard = span.enter();

    let actor = ctx.resolve_actor(&args.actor.actor)?;
    let patient = match &args.patient {
        Some(email) => ctx
            .find_user(email)
            .with_context(|| format!("resolve patient {}", redact_value(email)))?,
        None => actor.clone(),
    };
    let slot = TimeSlot::parse(&args.date, &args.time).context("parse appointment slot")?;
    let request =
        NewAppointment::new(patient.id, args.doctor, slot).with_reason(args.reason.as_deref());

    let appointment = ctx
        .manager()
        .book(request, &actor)
        .context("book appointment")?;
    let mut rows = ctx.rows(std::slice::from_ref(&appointment))?;
    rows.pop()
        .ok_or_else(|| anyhow!("booked appointment {} has no row", appointment.id))
}

/// Approve, reject or cancel an appointment.
pub fn run_decision(ctx: &AppContext, action: Action, args: &DecisionArgs) -> Result<AppointmentRow> {
    let actor = ctx.resolve_actor(&args.actor.actor)?;
    let appointment = ctx
        .manager()
        .apply(args.appointment, action, &actor)
        .with_context(|| format!("{action} appointment {}", args.appointment))?;
    let mut rows = ctx.rows(std::slice::from_ref(&appointment))?;
    rows.pop()
        .ok_or_else(|| anyhow!("appointment {} has no row", appointment.id))
}

pub fn run_appointments(ctx: &AppContext, args: &ActorArgs) -> Result<Vec<AppointmentRow>> {
    let actor = ctx.resolve_actor(&args.actor)?;
    let appointments = dashboard(ctx.store(), &actor)?;
    ctx.rows(&appointments)
}

pub fn run_stats(ctx: &AppContext, args: &ActorArgs) -> Result<ClinicStats> {
    let actor = ctx.resolve_actor(&args.actor)?;
    let stats = admin_stats(ctx.store(), &actor)?;
    Ok(stats)
}

/// Admin listing of every doctor or every patient account.
pub fn run_users(ctx: &AppContext, args: &UsersArgs) -> Result<Vec<User>> {
    let actor = ctx.resolve_actor(&args.actor.actor)?;
    let users = list_users(ctx.store(), &actor, args.role.into())?;
    Ok(users)
}
