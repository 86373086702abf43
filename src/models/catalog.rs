use serde::Serialize;

/// Bookable start times, 30 minutes apart.
pub const TIME_SLOTS: [&str; 7] = [
    "3:00 pm", "3:30 pm", "4:00 pm", "4:30 pm", "5:00 pm", "5:30 pm", "6:00 pm",
];

pub const MEETING_TITLE: &str = "30 Minute Complimentary Discovery Call";
pub const MEETING_DURATION_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Service {
    pub icon: &'static str,
    pub name: &'static str,
}

pub const SERVICES: [Service; 7] = [
    Service { icon: "⚡", name: "Web & App Development" },
    Service { icon: "🎨", name: "User experience design" },
    Service { icon: "📊", name: "Strategy & digital marketing" },
    Service { icon: "📹", name: "Video production & photography" },
    Service { icon: "💬", name: "Branding & communication" },
    Service { icon: "🔍", name: "Search engine optimization" },
    Service { icon: "📈", name: "Resource augmentation" },
];

pub fn is_time_slot(slot: &str) -> bool {
    TIME_SLOTS.contains(&slot)
}

pub fn is_service(name: &str) -> bool {
    SERVICES.iter().any(|s| s.name == name)
}
