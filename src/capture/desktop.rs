use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    X11,
    Unknown,
}

impl std::fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayServer::Wayland => write!(f, "Wayland"),
            DisplayServer::X11 => write!(f, "X11"),
            DisplayServer::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopEnvironment {
    Gnome,
    Kde,
    Hyprland,
    Sway,
    Other(Option<String>),
}

impl std::fmt::Display for DesktopEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesktopEnvironment::Gnome => write!(f, "GNOME"),
            DesktopEnvironment::Kde => write!(f, "KDE Plasma"),
            DesktopEnvironment::Hyprland => write!(f, "Hyprland"),
            DesktopEnvironment::Sway => write!(f, "Sway"),
            DesktopEnvironment::Other(Some(name)) => write!(f, "{}", name),
            DesktopEnvironment::Other(None) => write!(f, "Unknown"),
        }
    }
}

/// The desktop session the app runs in
#[derive(Debug, Clone)]
pub struct DesktopSession {
    pub display_server: DisplayServer,
    pub desktop_environment: DesktopEnvironment,
}

impl DesktopSession {
    pub fn detect() -> Self {
        Self::detect_with(|key| env::var(key).ok())
    }

    /// Detect using a custom variable lookup
    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let display_server = detect_display_server(&lookup);
        let desktop_environment = detect_desktop_environment(&lookup);

        Self {
            display_server,
            desktop_environment,
        }
    }

    pub fn is_wayland(&self) -> bool {
        self.display_server == DisplayServer::Wayland
    }

    /// Whether a process-wide keyboard listener can observe keys typed into
    /// other applications. Wayland compositors do not allow this.
    pub fn supports_global_hotkeys(&self) -> bool {
        !self.is_wayland()
    }
}

impl std::fmt::Display for DesktopSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.desktop_environment, self.display_server)
    }
}

fn detect_display_server<F>(lookup: &F) -> DisplayServer
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(session_type) = lookup("XDG_SESSION_TYPE") {
        match session_type.to_lowercase().as_str() {
            "wayland" => return DisplayServer::Wayland,
            "x11" => return DisplayServer::X11,
            _ => {}
        }
    }

    if lookup("WAYLAND_DISPLAY").is_some() {
        return DisplayServer::Wayland;
    }

    if lookup("DISPLAY").is_some() {
        return DisplayServer::X11;
    }

    // Also the answer on macOS and Windows, which do allow global listeners
    DisplayServer::Unknown
}

fn detect_desktop_environment<F>(lookup: &F) -> DesktopEnvironment
where
    F: Fn(&str) -> Option<String>,
{
    if lookup("HYPRLAND_INSTANCE_SIGNATURE").is_some() {
        return DesktopEnvironment::Hyprland;
    }

    if lookup("SWAYSOCK").is_some() {
        return DesktopEnvironment::Sway;
    }

    if let Some(current_desktop) = lookup("XDG_CURRENT_DESKTOP") {
        let desktop_lower = current_desktop.to_lowercase();

        for component in desktop_lower.split(':') {
            match component.trim() {
                "gnome" | "unity" | "ubuntu" | "pop" => return DesktopEnvironment::Gnome,
                "kde" | "plasma" | "kde-plasma" => return DesktopEnvironment::Kde,
                "hyprland" => return DesktopEnvironment::Hyprland,
                "sway" => return DesktopEnvironment::Sway,
                _ => continue,
            }
        }

        if !current_desktop.is_empty() {
            return DesktopEnvironment::Other(Some(current_desktop));
        }
    }

    if lookup("KDE_FULL_SESSION").is_some() {
        return DesktopEnvironment::Kde;
    }

    if lookup("GNOME_DESKTOP_SESSION_ID").is_some() {
        return DesktopEnvironment::Gnome;
    }

    DesktopEnvironment::Other(None)
}
