/// Every view the wizard can show. Exactly one is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    MainMenu,
    ResourceSelection,
    ActionSelection,
    TargetSelection,
    SecretFieldSelection,
    FlagsSelection,
    NamespaceInput,
    CommandPreview,
    CommandOutput,
    CommandHelp,
    ClusterConnectivity,
    ClusterInfo,
    CustomCommand,
    FavouritesList,
    SaveFavourite,
    RenameFavourite,
    HotkeysList,
    HotkeyBind,
    CommandHistory,
    SavedOutputsList,
    SavedOutputVersions,
    SavedOutputView,
    SaveOutputName,
    RenameSavedOutput,
    ContextsNamespacesMenu,
    ContextsList,
    NamespacesList,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::MainMenu => "Kube Wizard",
            Screen::ResourceSelection => "Select Resource",
            Screen::ActionSelection => "Select Action",
            Screen::TargetSelection => "Select Name",
            Screen::SecretFieldSelection => "Select Secret Field",
            Screen::FlagsSelection => "Select Flags",
            Screen::NamespaceInput => "Enter Namespace",
            Screen::CommandPreview => "Command Preview",
            Screen::CommandOutput => "Command Output",
            Screen::CommandHelp => "Command Help",
            Screen::ClusterConnectivity => "Cluster Connectivity",
            Screen::ClusterInfo => "Cluster Information",
            Screen::CustomCommand => "Custom Command",
            Screen::FavouritesList => "Favourites",
            Screen::SaveFavourite => "Save Favourite",
            Screen::RenameFavourite => "Rename Favourite",
            Screen::HotkeysList => "Hotkeys",
            Screen::HotkeyBind => "Bind Hotkey",
            Screen::CommandHistory => "Command History",
            Screen::SavedOutputsList => "Saved Outputs",
            Screen::SavedOutputVersions => "Saved Output Versions",
            Screen::SavedOutputView => "Saved Output",
            Screen::SaveOutputName => "Save Output",
            Screen::RenameSavedOutput => "Rename Saved Output",
            Screen::ContextsNamespacesMenu => "Contexts & Namespaces",
            Screen::ContextsList => "Kube Contexts",
            Screen::NamespacesList => "Namespaces",
        }
    }

    /// Screens that collect a line of text.
    pub fn is_text_input(self) -> bool {
        matches!(
            self,
            Screen::NamespaceInput
                | Screen::CustomCommand
                | Screen::SaveFavourite
                | Screen::RenameFavourite
                | Screen::SaveOutputName
                | Screen::RenameSavedOutput
        )
    }

    /// Screens that show scrollable text instead of a menu.
    pub fn is_viewport(self) -> bool {
        matches!(
            self,
            Screen::CommandOutput
                | Screen::CommandHelp
                | Screen::ClusterConnectivity
                | Screen::ClusterInfo
                | Screen::SavedOutputView
        )
    }

    /// Prompt shown above the text field on input screens.
    pub fn prompt(self) -> &'static str {
        match self {
            Screen::NamespaceInput => "Namespace for this command",
            Screen::CustomCommand => "kubectl command (the kubectl prefix is optional)",
            Screen::SaveFavourite => "Name for this favourite",
            Screen::RenameFavourite => "New favourite name",
            Screen::SaveOutputName => "Name for the saved output",
            Screen::RenameSavedOutput => "New name for this saved output group",
            _ => "",
        }
    }
}
