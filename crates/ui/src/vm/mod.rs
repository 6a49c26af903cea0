mod content_card_vm;
mod dashboard_vm;
mod login_vm;

pub use content_card_vm::{ContentCardVm, format_meta, format_rating, map_content_card};
pub use dashboard_vm::{
    CONTINUE_WATCHING_TITLE, ContentRowVm, DashboardVm, HeroVm, map_dashboard,
};
pub use login_vm::{AuthMode, CONFIRM_EMAIL_NOTICE, auth_error_message};
