// Sortable event strength table.

use std::cmp::Ordering;

use crate::model::EventData;

/// Columns of the event table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColumn {
    Name,
    TeamCount,
    MaxEpa,
    Top8Epa,
    Top24Epa,
    AvgEpa,
    MedianEpa,
}

impl EventColumn {
    pub const ALL: [EventColumn; 7] = [
        EventColumn::Name,
        EventColumn::TeamCount,
        EventColumn::MaxEpa,
        EventColumn::Top8Epa,
        EventColumn::Top24Epa,
        EventColumn::AvgEpa,
        EventColumn::MedianEpa,
    ];

    pub fn title(self) -> &'static str {
        match self {
            EventColumn::Name => "Event",
            EventColumn::TeamCount => "Teams",
            EventColumn::MaxEpa => "Max EPA",
            EventColumn::Top8Epa => "Top 8 EPA",
            EventColumn::Top24Epa => "Top 24 EPA",
            EventColumn::AvgEpa => "Avg EPA",
            EventColumn::MedianEpa => "Median EPA",
        }
    }

    fn metric(self, event: &EventData) -> f64 {
        match self {
            EventColumn::Name => 0.0,
            EventColumn::TeamCount => f64::from(event.teamcount),
            EventColumn::MaxEpa => event.maxepa.unwrap_or(0.0),
            EventColumn::Top8Epa => event.top8epa.unwrap_or(0.0),
            EventColumn::Top24Epa => event.top24epa.unwrap_or(0.0),
            EventColumn::AvgEpa => event.avgepa.unwrap_or(0.0),
            EventColumn::MedianEpa => event.medianepa.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current sort of the event table. Starts on event name, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSort {
    pub column: EventColumn,
    pub direction: SortDirection,
}

impl Default for EventSort {
    fn default() -> Self {
        EventSort {
            column: EventColumn::Name,
            direction: SortDirection::Ascending,
        }
    }
}

impl EventSort {
    /// Sort by `column`. Asking for the active column flips direction; a new
    /// column starts ascending.
    pub fn request(&mut self, column: EventColumn) {
        if self.column == column {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.column = column;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Sorted copy of `events`. Missing metrics compare as 0.
    pub fn sort<'a>(&self, events: &'a [EventData]) -> Vec<&'a EventData> {
        let mut sorted: Vec<&EventData> = events.iter().collect();
        sorted.sort_by(|a, b| {
            let ord = self.compare(a, b);
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        sorted
    }

    fn compare(&self, a: &EventData, b: &EventData) -> Ordering {
        match self.column {
            EventColumn::Name => a.event_name.cmp(&b.event_name),
            column => column.metric(a).total_cmp(&column.metric(b)),
        }
    }

    /// Header marker for `column`: an arrow on the active column.
    pub fn arrow(&self, column: EventColumn) -> &'static str {
        if self.column != column {
            return "";
        }
        match self.direction {
            SortDirection::Ascending => " ▲",
            SortDirection::Descending => " ▼",
        }
    }
}
