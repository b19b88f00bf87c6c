//! Integration tests for the appointment lifecycle.

use std::sync::Arc;
use std::thread;

use clinic_core::{
    AppointmentStore, LifecycleError, LifecycleManager, MemoryStore, RecordingNotifier, register,
};
use clinic_model::{
    Action, Appointment, AppointmentId, AppointmentStatus, NewAppointment, NotificationKind, Role,
    TimeSlot, User,
};

struct Clinic {
    store: MemoryStore,
    notifier: RecordingNotifier,
    patient: User,
    doctor: User,
    other_doctor: User,
    admin: User,
}

impl Clinic {
    fn new() -> Self {
        let store = MemoryStore::new();
        let patient = register(&store, "Vishnu", "patient@example.com", Role::Patient, None).unwrap();
        let doctor = register(
            &store,
            "Dr. Asha Rao",
            "doc1@example.com",
            Role::Doctor,
            Some("Cardiology"),
        )
        .unwrap();
        let other_doctor = register(
            &store,
            "Dr. Kiran Patel",
            "doc2@example.com",
            Role::Doctor,
            Some("Dermatology"),
        )
        .unwrap();
        let admin = register(&store, "Admin", "admin@example.com", Role::Admin, None).unwrap();
        Self {
            store,
            notifier: RecordingNotifier::new(),
            patient,
            doctor,
            other_doctor,
            admin,
        }
    }

    fn manager(&self) -> LifecycleManager<'_, MemoryStore, RecordingNotifier> {
        LifecycleManager::new(&self.store, &self.notifier)
    }

    fn book(&self, time: &str) -> Appointment {
        let slot = TimeSlot::parse("2025-09-15", time).unwrap();
        let appointment = self
            .manager()
            .book(
                NewAppointment::new(self.patient.id, self.doctor.id, slot),
                &self.patient,
            )
            .unwrap();
        self.notifier.take();
        appointment
    }

    fn status(&self, id: AppointmentId) -> AppointmentStatus {
        self.store.get_appointment(id).unwrap().status
    }
}

#[test]
fn scenario_book_approve_cancel_then_approve_again() {
    let clinic = Clinic::new();
    let manager = clinic.manager();
    let slot = TimeSlot::parse("2025-09-15", "10:00").unwrap();

    let booked = manager
        .book(
            NewAppointment::new(clinic.patient.id, clinic.doctor.id, slot),
            &clinic.patient,
        )
        .unwrap();
    assert_eq!(booked.status, AppointmentStatus::Requested);
    clinic.notifier.take();

    let approved = manager.approve(booked.id, &clinic.doctor).unwrap();
    assert_eq!(approved.status, AppointmentStatus::Approved);
    let sent = clinic.notifier.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "patient@example.com");
    assert_eq!(sent[0].kind, NotificationKind::AppointmentApproved);

    let cancelled = manager.cancel(booked.id, &clinic.doctor).unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    let sent = clinic.notifier.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "doc1@example.com");
    assert_eq!(sent[0].kind, NotificationKind::AppointmentCancelled);

    let again = manager.approve(booked.id, &clinic.doctor);
    assert!(matches!(
        again,
        Err(LifecycleError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
            action: Action::Approve,
        })
    ));
    assert_eq!(clinic.status(booked.id), AppointmentStatus::Cancelled);
    assert!(clinic.notifier.sent().is_empty());
}

#[test]
fn approve_and_reject_succeed_once() {
    let clinic = Clinic::new();
    let manager = clinic.manager();

    let first = clinic.book("09:00");
    manager.approve(first.id, &clinic.doctor).unwrap();
    assert!(matches!(
        manager.approve(first.id, &clinic.doctor),
        Err(LifecycleError::InvalidTransition { .. })
    ));
    assert!(matches!(
        manager.reject(first.id, &clinic.doctor),
        Err(LifecycleError::InvalidTransition { .. })
    ));

    let second = clinic.book("09:30");
    manager.reject(second.id, &clinic.doctor).unwrap();
    assert_eq!(clinic.status(second.id), AppointmentStatus::Rejected);
    assert!(matches!(
        manager.reject(second.id, &clinic.doctor),
        Err(LifecycleError::InvalidTransition { .. })
    ));
}

#[test]
fn cancel_fails_from_terminal_states() {
    let clinic = Clinic::new();
    let manager = clinic.manager();

    let rejected = clinic.book("11:00");
    manager.reject(rejected.id, &clinic.doctor).unwrap();
    assert!(matches!(
        manager.cancel(rejected.id, &clinic.patient),
        Err(LifecycleError::InvalidTransition {
            from: AppointmentStatus::Rejected,
            ..
        })
    ));

    let requested = clinic.book("11:30");
    manager.cancel(requested.id, &clinic.patient).unwrap();
    assert!(matches!(
        manager.cancel(requested.id, &clinic.patient),
        Err(LifecycleError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
            ..
        })
    ));
}

#[test]
fn unauthorized_actor_leaves_status_unchanged() {
    let clinic = Clinic::new();
    let manager = clinic.manager();
    let booked = clinic.book("14:00");

    let by_patient = manager.approve(booked.id, &clinic.patient);
    assert!(matches!(
        by_patient,
        Err(LifecycleError::Unauthorized {
            role: Role::Patient,
            action: Action::Approve,
            ..
        })
    ));

    let by_other_doctor = manager.reject(booked.id, &clinic.other_doctor);
    assert!(matches!(
        by_other_doctor,
        Err(LifecycleError::Unauthorized { .. })
    ));

    assert_eq!(clinic.status(booked.id), AppointmentStatus::Requested);
    assert!(clinic.notifier.sent().is_empty());
}

#[test]
fn admin_can_act_on_any_appointment() {
    let clinic = Clinic::new();
    let manager = clinic.manager();
    let booked = clinic.book("15:00");

    manager.approve(booked.id, &clinic.admin).unwrap();
    manager.cancel(booked.id, &clinic.admin).unwrap();
    assert_eq!(clinic.status(booked.id), AppointmentStatus::Cancelled);
}

#[test]
fn unknown_appointment_is_not_found() {
    let clinic = Clinic::new();
    let result = clinic
        .manager()
        .apply(AppointmentId::new(404), Action::Cancel, &clinic.admin);
    assert!(matches!(result, Err(LifecycleError::NotFound(id)) if id.get() == 404));
}

#[test]
fn book_action_on_existing_appointment_is_invalid() {
    let clinic = Clinic::new();
    let booked = clinic.book("16:00");
    let result = clinic
        .manager()
        .apply(booked.id, Action::Book, &clinic.patient);
    assert!(matches!(
        result,
        Err(LifecycleError::InvalidTransition {
            action: Action::Book,
            ..
        })
    ));
}

#[test]
fn patient_cannot_book_for_someone_else() {
    let clinic = Clinic::new();
    let other = register(&clinic.store, "Other", "other@example.com", Role::Patient, None).unwrap();
    let slot = TimeSlot::parse("2025-09-15", "08:00").unwrap();
    let result = clinic.manager().book(
        NewAppointment::new(other.id, clinic.doctor.id, slot),
        &clinic.patient,
    );
    assert!(matches!(
        result,
        Err(LifecycleError::Unauthorized {
            action: Action::Book,
            ..
        })
    ));
    assert!(clinic.store.appointments().unwrap().is_empty());
}

#[test]
fn taken_slot_is_unavailable_until_rejected() {
    let clinic = Clinic::new();
    let manager = clinic.manager();
    let first = clinic.book("10:30");

    let slot = TimeSlot::parse("2025-09-15", "10:30").unwrap();
    let request = NewAppointment::new(clinic.patient.id, clinic.doctor.id, slot);
    assert!(matches!(
        manager.book(request.clone(), &clinic.patient),
        Err(LifecycleError::SlotUnavailable { .. })
    ));

    // a different doctor at the same time is fine
    let elsewhere = NewAppointment::new(clinic.patient.id, clinic.other_doctor.id, slot);
    assert!(manager.book(elsewhere, &clinic.patient).is_ok());

    manager.reject(first.id, &clinic.doctor).unwrap();
    assert!(manager.book(request, &clinic.patient).is_ok());
}

#[test]
fn concurrent_decisions_only_one_wins() {
    let clinic = Arc::new(Clinic::new());
    let booked = clinic.book("12:00");

    let handles: Vec<_> = [Action::Approve, Action::Reject, Action::Approve, Action::Reject]
        .into_iter()
        .map(|action| {
            let clinic = Arc::clone(&clinic);
            thread::spawn(move || {
                clinic
                    .manager()
                    .apply(booked.id, action, &clinic.doctor)
                    .is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    let stored = clinic.store.get_appointment(booked.id).unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(clinic.notifier.sent().len(), 1);
}

#[test]
fn transition_refreshes_modified_timestamp_and_version() {
    let clinic = Clinic::new();
    let booked = clinic.book("17:00");
    let approved = clinic.manager().approve(booked.id, &clinic.doctor).unwrap();
    assert!(approved.updated_at >= booked.updated_at);
    assert_eq!(approved.created_at, booked.created_at);
    assert_eq!(approved.version, booked.version + 1);
    assert_eq!(approved.patient_id, booked.patient_id);
    assert_eq!(approved.doctor_id, booked.doctor_id);
}
