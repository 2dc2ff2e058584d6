use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

/// Segment-by-segment date entry: type digits for the year, month or day.
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub current_date_input: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            current_date_input: String::new(),
        }
    }

    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self::new(instant.date_naive())
    }

    /// Midnight UTC of the entered date.
    pub fn instant(&self) -> DateTime<Utc> {
        to_instant(self.date)
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            self.date_part = DatePart::Year;
            self.current_date_input.clear();
        }
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.current_date_input.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.current_date_input.clear();
    }

    fn digits_expected(&self) -> usize {
        match self.date_part {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.current_date_input.push(c);
                if self.current_date_input.len() < self.digits_expected() {
                    return;
                }

                // out-of-range entries leave the date untouched
                if let Ok(value) = self.current_date_input.parse::<u32>() {
                    let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());
                    let candidate = match self.date_part {
                        DatePart::Year if (1900..=2100).contains(&value) => {
                            NaiveDate::from_ymd_opt(value as i32, month, day)
                        }
                        DatePart::Month => NaiveDate::from_ymd_opt(year, value, day),
                        DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
                        DatePart::Year => None,
                    };
                    if let Some(date) = candidate {
                        self.date = date;
                    }
                }
                self.current_date_input.clear();
            }
            KeyCode::Backspace => {
                self.current_date_input.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    pub fn get_display_string(&self) -> String {
        let year = format!("{:04}", self.date.year());
        let month = format!("{:02}", self.date.month());
        let day = format!("{:02}", self.date.day());

        if !self.editing {
            return format!("{year}-{month}-{day}");
        }

        let current_input = if self.current_date_input.is_empty() {
            match self.date_part {
                DatePart::Year => "[YYYY]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Day => "[DD]".to_string(),
            }
        } else {
            format!("[{}]", self.current_date_input)
        };

        match self.date_part {
            DatePart::Year => format!("{year}{current_input}-{month}-{day}"),
            DatePart::Month => format!("{year}-{month}{current_input}-{day}"),
            DatePart::Day => format!("{year}-{month}-{day}{current_input}"),
        }
    }
}

pub fn to_instant(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}
