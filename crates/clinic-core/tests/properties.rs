//! Property tests: random action sequences against a single appointment.

use proptest::prelude::*;

use clinic_core::{
    AppointmentStore, LifecycleError, LifecycleManager, MemoryStore, RecordingNotifier, register,
};
use clinic_model::{Action, AppointmentStatus, NewAppointment, Role, TimeSlot, User};

#[derive(Debug, Clone, Copy)]
enum Who {
    Patient,
    Doctor,
    OtherDoctor,
    Admin,
}

fn who() -> impl Strategy<Value = Who> {
    prop_oneof![
        Just(Who::Patient),
        Just(Who::Doctor),
        Just(Who::OtherDoctor),
        Just(Who::Admin),
    ]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Book),
        Just(Action::Approve),
        Just(Action::Reject),
        Just(Action::Cancel),
    ]
}

/// Independent restatement of the rules, used as the oracle.
fn expected(status: AppointmentStatus, action: Action, who: Who) -> Result<AppointmentStatus, &'static str> {
    let authorized = match (who, action) {
        (Who::Admin, _) => true,
        (Who::Patient, Action::Book | Action::Cancel) => true,
        (Who::Doctor, Action::Approve | Action::Reject | Action::Cancel) => true,
        _ => false,
    };
    if !authorized {
        return Err("unauthorized");
    }
    match (status, action) {
        (AppointmentStatus::Requested, Action::Approve) => Ok(AppointmentStatus::Approved),
        (AppointmentStatus::Requested, Action::Reject) => Ok(AppointmentStatus::Rejected),
        (AppointmentStatus::Requested | AppointmentStatus::Approved, Action::Cancel) => {
            Ok(AppointmentStatus::Cancelled)
        }
        _ => Err("invalid"),
    }
}

struct People {
    patient: User,
    doctor: User,
    other_doctor: User,
    admin: User,
}

impl People {
    fn get(&self, who: Who) -> &User {
        match who {
            Who::Patient => &self.patient,
            Who::Doctor => &self.doctor,
            Who::OtherDoctor => &self.other_doctor,
            Who::Admin => &self.admin,
        }
    }
}

fn setup(store: &MemoryStore) -> People {
    People {
        patient: register(store, "P", "p@example.com", Role::Patient, None).unwrap(),
        doctor: register(store, "D", "d@example.com", Role::Doctor, None).unwrap(),
        other_doctor: register(store, "O", "o@example.com", Role::Doctor, None).unwrap(),
        admin: register(store, "A", "a@example.com", Role::Admin, None).unwrap(),
    }
}

proptest! {
    #[test]
    fn status_follows_transition_table(steps in prop::collection::vec((action(), who()), 1..12)) {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let people = setup(&store);
        let manager = LifecycleManager::new(&store, &notifier);
        let slot = TimeSlot::parse("2025-10-01", "09:00").unwrap();
        let booked = manager
            .book(NewAppointment::new(people.patient.id, people.doctor.id, slot), &people.patient)
            .unwrap();
        prop_assert_eq!(booked.status, AppointmentStatus::Requested);
        prop_assert_eq!(notifier.take().len(), 2);

        let mut status = booked.status;
        for (action, who) in steps {
            let result = manager.apply(booked.id, action, people.get(who));
            let stored = store.get_appointment(booked.id).unwrap().status;
            match expected(status, action, who) {
                Ok(next) => {
                    let updated = result.unwrap();
                    prop_assert_eq!(updated.status, next);
                    prop_assert_eq!(stored, next);
                    prop_assert_eq!(notifier.take().len(), 1);
                    status = next;
                }
                Err("unauthorized") => {
                    let is_unauthorized = matches!(result, Err(LifecycleError::Unauthorized { .. }));
                    prop_assert!(is_unauthorized);
                    prop_assert_eq!(stored, status);
                    prop_assert!(notifier.take().is_empty());
                }
                Err(_) => {
                    let is_invalid = matches!(result, Err(LifecycleError::InvalidTransition { .. }));
                    prop_assert!(is_invalid);
                    prop_assert_eq!(stored, status);
                    prop_assert!(notifier.take().is_empty());
                }
            }
        }
    }

    #[test]
    fn booking_always_starts_requested(hour in 0u32..24, minute in 0u32..60, reason in ".{0,20}") {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let people = setup(&store);
        let manager = LifecycleManager::new(&store, &notifier);
        let slot = TimeSlot::parse("2025-10-02", &format!("{hour:02}:{minute:02}")).unwrap();
        let request = NewAppointment::new(people.patient.id, people.doctor.id, slot)
            .with_reason(Some(&reason));

        let booked = manager.book(request, &people.patient).unwrap();

        prop_assert_eq!(booked.status, AppointmentStatus::Requested);
        prop_assert_eq!(booked.slot, slot);
        prop_assert_eq!(booked.version, 0);
    }
}
