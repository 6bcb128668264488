use shared::{BoxLayout, Calendar, DateGate, RevealTimings};
use yew::prelude::*;

use super::advent_box::AdventBox;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct AdventCalendarProps {
    pub calendar: Calendar,
    pub api_client: ApiClient,
    pub on_day_opened: Callback<u32>,
    #[prop_or_default]
    pub gate: Option<DateGate>,
    #[prop_or_default]
    pub timings: RevealTimings,
}

#[function_component(AdventCalendar)]
pub fn advent_calendar(props: &AdventCalendarProps) -> Html {
    let calendar = &props.calendar;
    let gate = props.gate.unwrap_or_default();
    let total = calendar.days.len() as u32;
    let layout = use_memo((calendar.id, total), |&(id, total)| {
        BoxLayout::shuffled(id as u64, total)
    });

    // Slots are handed out in day order, so every box gets a cell
    let boxes = calendar.days_sorted().into_iter().zip(1..).map(|(day, slot)| {
        let style = match layout.position(slot) {
            Some((col, row)) => format!("grid-column: {}; grid-row: {};", col + 1, row + 1),
            None => String::new(),
        };

        html! {
            <AdventBox
                key={day.day}
                day={day.day}
                api_client={props.api_client.clone()}
                is_db_open={day.is_open}
                can_open={gate.can_open_today(day.day)}
                on_open={props.on_day_opened.clone()}
                style={style}
                timings={props.timings}
            />
        }
    });

    html! {
        <section class="advent-calendar">
            <div class="advent-calendar-header">
                <h2>{&calendar.name}</h2>
                <span class="advent-progress">
                    {format!("{} / {} opened", calendar.opened_count(), total)}
                </span>
            </div>
            <div class="advent-grid">
                { for boxes }
            </div>
        </section>
    }
}
