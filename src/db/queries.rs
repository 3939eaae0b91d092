use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::booking::hhmm;
use crate::models::{
    Booking, BookingStatus, CampRegistration, EventCategory, PastEvent, PaymentStatus,
    StallRegistration, StallSize, Testimonial,
};

const BOOKING_COLUMNS: &str =
    "id, client_name, client_email, event_type, date, time, guests, status, notes, payment, version";

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, client_name, client_email, event_type, date, time, guests, status, notes, payment, version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.client_name,
            booking.client_email,
            booking.event_type,
            booking.date.format("%Y-%m-%d").to_string(),
            booking.time.format("%H:%M").to_string(),
            booking.guests,
            booking.status.as_str(),
            booking.notes,
            booking.payment,
            booking.version,
        ],
    )?;
    Ok(())
}

/// Full snapshot in insertion order.
pub fn list_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY rowid ASC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn list_bookings_on_date(conn: &Connection, date: NaiveDate) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE date = ?1 ORDER BY rowid ASC"
    ))?;

    let rows = stmt.query_map(params![date.format("%Y-%m-%d").to_string()], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;

    result.transpose()
}

pub fn count_bookings(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;
    Ok(count)
}

#[derive(Debug, PartialEq)]
pub enum StatusUpdate {
    Updated,
    Missing,
    Stale { current: i64 },
}

/// Writes only the status column (and bumps the version). With
/// `expected_version`, the write lands only if the stored version matches.
pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
    expected_version: Option<i64>,
) -> anyhow::Result<StatusUpdate> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, version = version + 1
         WHERE id = ?2 AND (?3 IS NULL OR version = ?3)",
        params![status.as_str(), id, expected_version],
    )?;

    if count > 0 {
        return Ok(StatusUpdate::Updated);
    }

    let current: Option<i64> = conn
        .query_row(
            "SELECT version FROM bookings WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(match current {
        Some(current) => StatusUpdate::Stale { current },
        None => StatusUpdate::Missing,
    })
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let date_str: String = row.get(4)?;
    let time_str: String = row.get(5)?;
    let status_str: String = row.get(7)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("booking {id} has invalid date {date_str:?}: {e}"))?;
    let time = hhmm::parse(&time_str)
        .ok_or_else(|| anyhow::anyhow!("booking {id} has invalid time {time_str:?}"))?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| anyhow::anyhow!("booking {id} has unknown status {status_str:?}"))?;

    Ok(Booking {
        client_name: row.get(1)?,
        client_email: row.get(2)?,
        event_type: row.get(3)?,
        date,
        time,
        guests: row.get(6)?,
        status,
        notes: row.get(8)?,
        payment: row.get(9)?,
        version: row.get(10)?,
        id,
    })
}

// ── Past Events & Testimonials ──

pub fn insert_past_event(conn: &Connection, event: &PastEvent) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO past_events (id, title, category, image_url, caption) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event.id,
            event.title,
            event.category.as_str(),
            event.image_url,
            event.caption,
        ],
    )?;
    Ok(())
}

pub fn list_past_events(conn: &Connection) -> anyhow::Result<Vec<PastEvent>> {
    let mut stmt = conn
        .prepare("SELECT id, title, category, image_url, caption FROM past_events ORDER BY rowid ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut events = vec![];
    for row in rows {
        let (id, title, category, image_url, caption) = row?;
        let category = EventCategory::parse(&category)
            .ok_or_else(|| anyhow::anyhow!("past event {id} has unknown category {category:?}"))?;
        events.push(PastEvent {
            id,
            title,
            category,
            image_url,
            caption,
        });
    }
    Ok(events)
}

pub fn insert_testimonial(conn: &Connection, testimonial: &Testimonial) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO testimonials (id, name, event_type, quote, avatar_url) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            testimonial.id,
            testimonial.name,
            testimonial.event_type,
            testimonial.quote,
            testimonial.avatar_url,
        ],
    )?;
    Ok(())
}

pub fn list_testimonials(conn: &Connection) -> anyhow::Result<Vec<Testimonial>> {
    let mut stmt = conn
        .prepare("SELECT id, name, event_type, quote, avatar_url FROM testimonials ORDER BY rowid ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Testimonial {
            id: row.get(0)?,
            name: row.get(1)?,
            event_type: row.get(2)?,
            quote: row.get(3)?,
            avatar_url: row.get(4)?,
        })
    })?;

    let mut testimonials = vec![];
    for row in rows {
        testimonials.push(row?);
    }
    Ok(testimonials)
}

// ── Registrations ──

pub fn insert_stall(conn: &Connection, stall: &StallRegistration) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO stall_registrations (id, vendor_name, stall_size, category, payment_status, stall_number)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            stall.id,
            stall.vendor_name,
            stall.stall_size.as_str(),
            stall.category,
            stall.payment_status.as_str(),
            stall.stall_number,
        ],
    )?;
    Ok(())
}

pub fn list_stalls(conn: &Connection) -> anyhow::Result<Vec<StallRegistration>> {
    let mut stmt = conn.prepare(
        "SELECT id, vendor_name, stall_size, category, payment_status, stall_number
         FROM stall_registrations ORDER BY rowid ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, Option<u32>>(5)?,
        ))
    })?;

    let mut stalls = vec![];
    for row in rows {
        let (id, vendor_name, size, category, payment, stall_number) = row?;
        let stall_size = StallSize::parse(&size)
            .ok_or_else(|| anyhow::anyhow!("stall {id} has unknown size {size:?}"))?;
        let payment_status = PaymentStatus::parse(&payment)
            .ok_or_else(|| anyhow::anyhow!("stall {id} has unknown payment status {payment:?}"))?;
        stalls.push(StallRegistration {
            id,
            vendor_name,
            stall_size,
            category,
            payment_status,
            stall_number,
        });
    }
    Ok(stalls)
}

pub fn insert_camp(conn: &Connection, camp: &CampRegistration) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO camp_registrations (id, child_name, age, activity, payment_status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            camp.id,
            camp.child_name,
            camp.age,
            camp.activity,
            camp.payment_status.as_str(),
        ],
    )?;
    Ok(())
}

pub fn list_camps(conn: &Connection) -> anyhow::Result<Vec<CampRegistration>> {
    let mut stmt = conn.prepare(
        "SELECT id, child_name, age, activity, payment_status FROM camp_registrations ORDER BY rowid ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u32>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut camps = vec![];
    for row in rows {
        let (id, child_name, age, activity, payment) = row?;
        let payment_status = PaymentStatus::parse(&payment)
            .ok_or_else(|| anyhow::anyhow!("camp {id} has unknown payment status {payment:?}"))?;
        camps.push(CampRegistration {
            id,
            child_name,
            age,
            activity,
            payment_status,
        });
    }
    Ok(camps)
}
