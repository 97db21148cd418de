use serde::{Deserialize, Serialize};

/// Icon vocabulary for widget nodes, composer tools, and start screen
/// prompts. Wire names are kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetIcon {
    Agent,
    Analytics,
    Atom,
    Batch,
    Bolt,
    BookOpen,
    BookClosed,
    BookClock,
    Bug,
    Calendar,
    Chart,
    Check,
    CheckCircle,
    CheckCircleFilled,
    ChevronLeft,
    ChevronRight,
    CircleQuestion,
    Compass,
    Confetti,
    Cube,
    Desktop,
    Document,
    Dot,
    DotsHorizontal,
    DotsVertical,
    EmptyCircle,
    ExternalLink,
    Globe,
    Keys,
    Lab,
    Images,
    Info,
    Lifesaver,
    Lightbulb,
    Mail,
    MapPin,
    Maps,
    Mobile,
    Name,
    Notebook,
    NotebookPencil,
    PageBlank,
    Phone,
    Play,
    Plus,
    Profile,
    ProfileCard,
    Reload,
    Star,
    StarFilled,
    Search,
    Sparkle,
    SparkleDouble,
    SquareCode,
    SquareImage,
    SquareText,
    Suitcase,
    SettingsSlider,
    User,
    Wreath,
    Write,
    WriteAlt,
    WriteAlt2,
}

/// Icon vocabulary for the header's custom action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderIcon {
    SidebarLeft,
    SidebarRight,
    SidebarOpenLeft,
    SidebarOpenRight,
    SidebarOpenLeftAlt,
    SidebarOpenRightAlt,
    SidebarFloatingLeft,
    SidebarFloatingRight,
    SidebarFloatingOpenLeft,
    SidebarFloatingOpenRight,
    SidebarCollapseLeft,
    SidebarCollapseRight,
    CollapseLeft,
    CollapseRight,
    OpenLeft,
    OpenRight,
    DoubleChevronLeft,
    DoubleChevronRight,
    Home,
    HomeAlt,
    BackSmall,
    BackLarge,
    ExpandLarge,
    CollapseLarge,
    ExpandSmall,
    CollapseSmall,
    Star,
    StarFilled,
    ChatTemporary,
    SettingsCog,
    Grid,
    DotsHorizontal,
    DotsVertical,
    DotsHorizontalCircle,
    DotsVerticalCircle,
    Menu,
    MenuInverted,
    Hamburger,
    Compose,
    LightMode,
    DarkMode,
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_icons_use_kebab_case_wire_names() {
        let json = serde_json::to_string(&WidgetIcon::NotebookPencil).unwrap();
        assert_eq!(json, "\"notebook-pencil\"");

        let json = serde_json::to_string(&WidgetIcon::WriteAlt2).unwrap();
        assert_eq!(json, "\"write-alt2\"");

        let parsed: WidgetIcon = serde_json::from_str("\"check-circle-filled\"").unwrap();
        assert_eq!(parsed, WidgetIcon::CheckCircleFilled);
    }

    #[test]
    fn header_icons_round_trip() {
        let parsed: HeaderIcon = serde_json::from_str("\"sidebar-open-left-alt\"").unwrap();
        assert_eq!(parsed, HeaderIcon::SidebarOpenLeftAlt);
        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            "\"sidebar-open-left-alt\""
        );
    }
}
