//! Status and kind enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding lookup table, and `as_str` matches the seeded name.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up the variant for a database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// The seeded lookup-table name for this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Match request lifecycle status. A request leaves `Pending` exactly
    /// once and never returns to it.
    MatchStatus {
        Pending = 1 => "pending",
        Matched = 2 => "matched",
        Expired = 3 => "expired",
        Cancelled = 4 => "cancelled",
    }
}

define_status_enum! {
    /// Chat session lifecycle status. `Ended` is terminal.
    SessionStatus {
        Active = 1 => "active",
        Ended = 2 => "ended",
    }
}

define_status_enum! {
    /// Closed set of message kinds. Free-form kind strings from clients are
    /// parsed into this enum at the messaging gateway boundary.
    MessageKind {
        Text = 1 => "text",
        Image = 2 => "image",
        Audio = 3 => "audio",
        File = 4 => "file",
        Video = 5 => "video",
    }
}

impl MessageKind {
    /// Parse a client-supplied kind name. Returns `None` for anything
    /// outside the closed set.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "audio" => Some(Self::Audio),
            "file" => Some(Self::File),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}
