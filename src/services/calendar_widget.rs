use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::Booking;
use crate::services::availability::{self, BookedDatePolicy, MonthGrid};

/// Visual state of one day. When several apply, the earlier variant wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Selected,
    Booked,
    Today,
    Default,
}

impl CellState {
    pub fn is_interactive(&self) -> bool {
        !matches!(self, CellState::Booked)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub state: CellState,
    pub interactive: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub weekdays: [&'static str; 7],
    pub selected_date: Option<NaiveDate>,
    pub booked_dates: Vec<NaiveDate>,
    /// `None` is a leading blank.
    pub cells: Vec<Option<DayCell>>,
}

/// The public availability calendar: a navigable month with one selectable day.
#[derive(Clone, Debug)]
pub struct CalendarWidget {
    current_year: i32,
    current_month: u32,
    selected_date: Option<NaiveDate>,
    today: NaiveDate,
    booked: BTreeSet<NaiveDate>,
}

impl CalendarWidget {
    /// Opens on the month containing `today`, with nothing selected.
    pub fn new(today: NaiveDate, bookings: &[Booking], policy: BookedDatePolicy) -> Self {
        Self {
            current_year: today.year(),
            current_month: today.month(),
            selected_date: None,
            today,
            booked: availability::booked_dates(bookings, policy),
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn current_month(&self) -> u32 {
        self.current_month
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn is_booked(&self, date: NaiveDate) -> bool {
        self.booked.contains(&date)
    }

    /// Recomputes occupancy from a fresh snapshot, e.g. after a submission.
    pub fn refresh(&mut self, bookings: &[Booking], policy: BookedDatePolicy) {
        self.booked = availability::booked_dates(bookings, policy);
    }

    /// Jumps straight to a month.
    pub fn show_month(&mut self, year: i32, month: u32) -> Result<(), AppError> {
        MonthGrid::new(year, month)?;
        self.current_year = year;
        self.current_month = month;
        Ok(())
    }

    /// Moves the displayed month by `delta`, carrying across year boundaries.
    pub fn navigate(&mut self, delta: i32) {
        let index = self.current_year as i64 * 12 + (self.current_month as i64 - 1) + delta as i64;
        self.current_year = index.div_euclid(12) as i32;
        self.current_month = index.rem_euclid(12) as u32 + 1;
    }

    /// Selects `date` unless it is booked. Booked dates are inert: the
    /// selection stays as it was and `false` is returned.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        if self.is_booked(date) {
            tracing::debug!(date = %date, "ignoring selection of booked date");
            return false;
        }
        self.selected_date = Some(date);
        true
    }

    pub fn cell_state(&self, date: NaiveDate) -> CellState {
        if self.selected_date == Some(date) {
            CellState::Selected
        } else if self.is_booked(date) {
            CellState::Booked
        } else if date == self.today {
            CellState::Today
        } else {
            CellState::Default
        }
    }

    pub fn grid(&self) -> Result<MonthGrid, AppError> {
        MonthGrid::new(self.current_year, self.current_month)
    }

    pub fn render(&self) -> Result<CalendarView, AppError> {
        let grid = self.grid()?;
        let cells = grid
            .cells()
            .map(|cell| {
                cell.map(|date| {
                    let state = self.cell_state(date);
                    DayCell {
                        date,
                        day: date.day(),
                        state,
                        interactive: state.is_interactive(),
                    }
                })
            })
            .collect();

        Ok(CalendarView {
            year: grid.year,
            month: grid.month,
            title: availability::month_title(grid.year, grid.month),
            weekdays: availability::WEEKDAY_LABELS,
            selected_date: self.selected_date,
            booked_dates: self
                .booked
                .iter()
                .copied()
                .filter(|d| grid.contains(*d))
                .collect(),
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::NaiveTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(day: &str, status: BookingStatus) -> Booking {
        Booking {
            id: format!("B-{day}"),
            client_name: "Client".to_string(),
            client_email: "client@example.com".to_string(),
            event_type: "Wedding".to_string(),
            date: date(day),
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            guests: 100,
            status,
            notes: String::new(),
            payment: 0.0,
            version: 1,
        }
    }

    fn august_widget() -> CalendarWidget {
        let bookings = vec![
            booking("2024-08-15", BookingStatus::Confirmed),
            booking("2024-08-20", BookingStatus::Confirmed),
        ];
        CalendarWidget::new(date("2024-08-10"), &bookings, BookedDatePolicy::AnyStatus)
    }

    #[test]
    fn test_opens_on_today_month() {
        let widget = august_widget();
        assert_eq!((widget.current_year(), widget.current_month()), (2024, 8));
        assert_eq!(widget.selected_date(), None);
    }

    #[test]
    fn test_navigate_wraps_year_boundaries() {
        let mut widget = CalendarWidget::new(date("2024-01-05"), &[], BookedDatePolicy::AnyStatus);
        widget.navigate(-1);
        assert_eq!((widget.current_year(), widget.current_month()), (2023, 12));

        widget.navigate(1);
        assert_eq!((widget.current_year(), widget.current_month()), (2024, 1));

        widget.show_month(2024, 12).unwrap();
        widget.navigate(1);
        assert_eq!((widget.current_year(), widget.current_month()), (2025, 1));

        widget.navigate(-25);
        assert_eq!((widget.current_year(), widget.current_month()), (2022, 12));
    }

    #[test]
    fn test_select_booked_date_is_inert() {
        let mut widget = august_widget();
        assert!(widget.select_date(date("2024-08-16")));
        assert!(!widget.select_date(date("2024-08-15")));
        assert_eq!(widget.selected_date(), Some(date("2024-08-16")));
    }

    #[test]
    fn test_select_free_date_always_updates() {
        let mut widget = august_widget();
        for day in MonthGrid::new(2024, 8).unwrap().days {
            if widget.is_booked(day) {
                continue;
            }
            assert!(widget.select_date(day));
            assert_eq!(widget.selected_date(), Some(day));
        }
    }

    #[test]
    fn test_cell_state_precedence() {
        let mut widget = august_widget();
        assert_eq!(widget.cell_state(date("2024-08-15")), CellState::Booked);
        assert_eq!(widget.cell_state(date("2024-08-10")), CellState::Today);
        assert_eq!(widget.cell_state(date("2024-08-11")), CellState::Default);

        widget.select_date(date("2024-08-10"));
        assert_eq!(widget.cell_state(date("2024-08-10")), CellState::Selected);
    }

    #[test]
    fn test_selected_beats_booked_after_refresh() {
        let mut widget = august_widget();
        widget.select_date(date("2024-08-16"));
        widget.refresh(
            &[booking("2024-08-16", BookingStatus::Pending)],
            BookedDatePolicy::AnyStatus,
        );
        assert!(widget.is_booked(date("2024-08-16")));
        assert_eq!(widget.cell_state(date("2024-08-16")), CellState::Selected);
    }

    #[test]
    fn test_render_marks_booked_cells() {
        let widget = august_widget();
        let view = widget.render().unwrap();

        assert_eq!(view.title, "August 2024");
        assert_eq!(view.cells.len(), 4 + 31);
        assert_eq!(view.booked_dates, vec![date("2024-08-15"), date("2024-08-20")]);

        let booked: Vec<u32> = view
            .cells
            .iter()
            .flatten()
            .filter(|c| c.state == CellState::Booked)
            .map(|c| c.day)
            .collect();
        assert_eq!(booked, vec![15, 20]);
        assert!(view.cells.iter().flatten().filter(|c| !c.interactive).count() == 2);
    }
}
