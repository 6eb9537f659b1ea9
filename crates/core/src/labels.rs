//! Fixed Arabic strings shown by the game.

pub const MAP_TITLE: &str = "خريطة العالم";
pub const QUICK_PLAY: &str = "لعب سريع";
pub const QUESTION_PROMPT: &str = "من هذا الحيوان؟";
pub const LISTEN_HINT: &str = "اضغط للاستماع للصوت";
pub const NEXT_LEVEL: &str = "المرحلة التالية";
pub const RETRY: &str = "إعادة ↻";
pub const BACK_TO_MAP: &str = "الخريطة";

pub const RESULT_PERFECT: &str = "مذهل!";
pub const RESULT_PASSED: &str = "رائع!";
pub const RESULT_FAILED: &str = "حاول ثانية!";
