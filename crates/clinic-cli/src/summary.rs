use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use clinic_core::ClinicStats;
use clinic_model::{AppointmentStatus, User};

use crate::types::{AppointmentRow, InitReport};

pub fn print_init_report(report: &InitReport) {
    println!("Database: {}", report.path.display());
    if report.created.is_empty() {
        println!("Sample accounts already present.");
    } else {
        println!("Created sample accounts:");
        for email in &report.created {
            println!("- {email}");
        }
    }
    print_doctors(&report.doctors);
}

pub fn print_user(user: &User) {
    println!("Registered {} #{} ({})", user.role, user.id, user.email);
}

pub fn print_doctors(doctors: &[User]) {
    if doctors.is_empty() {
        println!("No doctors found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Specialization"),
        header_cell("Email"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for doctor in doctors {
        table.add_row(vec![
            Cell::new(doctor.id),
            Cell::new(&doctor.name),
            optional_cell(doctor.specialization.as_deref()),
            Cell::new(&doctor.email),
        ]);
    }
    println!("{table}");
}

pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No accounts found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Role"),
        header_cell("Email"),
        header_cell("Specialization"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.name),
            Cell::new(user.role),
            Cell::new(&user.email),
            optional_cell(user.specialization.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_appointment(row: &AppointmentRow) {
    print_appointments(std::slice::from_ref(row));
}

pub fn print_appointments(rows: &[AppointmentRow]) {
    if rows.is_empty() {
        println!("No appointments.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Patient"),
        header_cell("Doctor"),
        header_cell("Slot"),
        header_cell("Status"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(&row.patient),
            Cell::new(&row.doctor),
            Cell::new(&row.slot),
            status_cell(row.status),
            optional_cell(row.reason.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_stats(stats: &ClinicStats) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Doctors"), Cell::new(stats.doctors)]);
    table.add_row(vec![Cell::new("Patients"), Cell::new(stats.patients)]);
    table.add_row(vec![Cell::new("Admins"), Cell::new(stats.admins)]);
    for status in AppointmentStatus::ALL {
        table.add_row(vec![status_cell(status), Cell::new(stats.count(status))]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stats.appointments).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(status: AppointmentStatus) -> Cell {
    let color = match status {
        AppointmentStatus::Requested => Color::Yellow,
        AppointmentStatus::Approved => Color::Green,
        AppointmentStatus::Rejected => Color::Red,
        AppointmentStatus::Cancelled => Color::DarkGrey,
    };
    Cell::new(status).fg(color)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => Cell::new("-").add_attribute(Attribute::Dim),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
