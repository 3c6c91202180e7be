//! Attribute catalogue
//!
//! The catalogue is a closed enum: a node's identity, wire name, parent and
//! required children are all resolved by `match`, so the table is immutable,
//! shared freely between tasks and never needs initialization.

use std::fmt;

/// Declares the catalogue: one variant per node, its wire name and its parent.
macro_rules! attributes {
    (@parent) => { None };
    (@parent $parent:ident) => { Some(Attribute::$parent) };
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $name:literal $(in $parent:ident)?
        ),+ $(,)?
    ) => {
        /// A node of the tracking attribute schema
        ///
        /// Root attributes have no parent and appear as top-level keys of the
        /// payload. Every other attribute lives under its parent's object.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Attribute {
            $( $(#[$meta])* $variant, )+
        }

        impl Attribute {
            /// Every attribute of the catalogue, in declaration order
            pub const ALL: &'static [Attribute] = &[ $( Attribute::$variant, )+ ];

            /// Wire name of this attribute (the JSON key it is stored under)
            #[inline]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Attribute::$variant => $name, )+
                }
            }

            /// Parent attribute, `None` for roots
            #[inline]
            pub const fn parent(self) -> Option<Attribute> {
                match self {
                    $( Attribute::$variant => attributes!(@parent $($parent)?), )+
                }
            }
        }
    };
}

attributes! {
    // =========================================================================
    // Roots
    // =========================================================================
    /// Tag management metadata
    Tealium => "tealium",
    /// Page being viewed
    Page => "page",
    /// Visitor identity and consent
    User => "user",
    /// Campaign attribution
    Attribution => "attribution",
    /// Deployment environment name
    Environment => "environment",
    /// Transient request data, never required
    Request => "request",

    // =========================================================================
    // tealium.*
    // =========================================================================
    TealiumAccount => "account" in Tealium,
    TealiumProfile => "profile" in Tealium,
    TealiumEvent => "event" in Tealium,
    TealiumTraceId => "trace_id" in Tealium,

    // =========================================================================
    // page.*
    // =========================================================================
    PageName => "name" in Page,
    PageUrl => "url" in Page,
    PageParams => "params" in Page,
    PagePrevious => "previous" in Page,
    PageSectionType => "section_type" in Page,
    PageSeoType => "seo_type" in Page,
    PageEvent => "event" in Page,
    PagePush => "push" in Page,
    PageClick => "click" in Page,
    PageRegion => "region" in Page,

    // =========================================================================
    // user.*
    // =========================================================================
    UserErmesVisitorId => "ermes_visitor_id" in User,
    UserVisitorId => "visitor_id" in User,
    UserCorrelationId => "correlation_id" in User,
    /// Group: hashed email variants
    UserEmail => "email" in User,
    UserVisitorType => "visitor_type" in User,
    UserKiouiType => "kioui_type" in User,
    UserSignedIn => "signed_in" in User,
    /// Group: device identifiers and settings
    UserDevice => "device" in User,
    UserChannel => "channel" in User,
    UserConsentedVendors => "consented_vendors" in User,
    UserConsentString => "consent_string" in User,
    UserConsentId => "consent_id" in User,
    UserExemptId => "exempt_id" in User,
    /// Group: session identifiers
    UserSession => "session" in User,
    UserIp => "ip" in User,
    UserAgent => "user_agent" in User,
    UserBirthdate => "birthdate" in User,
    UserFlagship => "flagship" in User,

    // =========================================================================
    // user.email.*
    // =========================================================================
    EmailHidden => "hidden" in UserEmail,
    EmailStrong => "strong" in UserEmail,
    EmailStronger => "stronger" in UserEmail,

    // =========================================================================
    // user.device.*
    // =========================================================================
    DeviceAdId => "adid" in UserDevice,
    DeviceIdfa => "idfa" in UserDevice,
    DeviceIdfv => "idfv" in UserDevice,
    DeviceAdjustId => "adjust_id" in UserDevice,
    DeviceOsVersion => "os_version" in UserDevice,
    DeviceType => "type" in UserDevice,
    DeviceAppVersion => "app_version" in UserDevice,
    DeviceGeolocationActivated => "geolocation_activated" in UserDevice,
    DeviceLanguage => "language" in UserDevice,
    DeviceCountry => "country" in UserDevice,
    DeviceTheme => "theme" in UserDevice,

    // =========================================================================
    // user.session.*
    // =========================================================================
    SessionId => "id" in UserSession,
    SessionErmesId => "ermes_id" in UserSession,
    SessionInit => "init" in UserSession,
}

impl Attribute {
    /// Roots that must be present in a complete payload
    ///
    /// `request` is transient and intentionally absent.
    pub const REQUIRED_ROOTS: &'static [Attribute] = &[
        Attribute::Tealium,
        Attribute::Page,
        Attribute::User,
        Attribute::Attribution,
        Attribute::Environment,
    ];

    /// Children that must exist under this attribute wherever it is instantiated
    pub const fn required_children(self) -> &'static [Attribute] {
        match self {
            Self::Tealium => &[Self::TealiumAccount, Self::TealiumProfile, Self::TealiumEvent],
            Self::Page => &[Self::PageName, Self::PageUrl],
            Self::User => &[
                Self::UserVisitorType,
                Self::UserSignedIn,
                Self::UserDevice,
                Self::UserChannel,
            ],
            Self::UserSession => &[Self::SessionInit],
            _ => &[],
        }
    }

    /// Required list declared by this attribute's group
    ///
    /// For a root this is [`Attribute::REQUIRED_ROOTS`]; for any other node it
    /// is the list of siblings that must exist under its parent.
    pub const fn required_fields(self) -> &'static [Attribute] {
        match self.parent() {
            Some(parent) => parent.required_children(),
            None => Self::REQUIRED_ROOTS,
        }
    }

    /// Whether this attribute is a root of the schema
    #[inline]
    pub const fn is_root(self) -> bool {
        self.parent().is_none()
    }

    /// Whether payloads must contain this attribute under its parent
    pub fn is_required(self) -> bool {
        self.required_fields().contains(&self)
    }

    /// Root this attribute descends from (itself for roots)
    pub fn root(self) -> Attribute {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Root and the path from the root's immediate child down to `self`
    ///
    /// The path is empty for roots.
    ///
    /// ```
    /// use trackit_client::Attribute;
    ///
    /// let (root, path) = Attribute::EmailHidden.path();
    /// assert_eq!(root, Attribute::User);
    /// assert_eq!(path, vec![Attribute::UserEmail, Attribute::EmailHidden]);
    /// ```
    pub fn path(self) -> (Attribute, Vec<Attribute>) {
        let mut path = Vec::new();
        let mut current = self;
        while let Some(parent) = current.parent() {
            path.push(current);
            current = parent;
        }
        path.reverse();
        (current, path)
    }

    /// Dotted path from the root, e.g. `user.email.hidden`
    pub fn dotted_path(self) -> String {
        let (root, path) = self.path();
        let mut out = String::from(root.name());
        for attribute in path {
            out.push('.');
            out.push_str(attribute.name());
        }
        out
    }

    /// Direct children of this attribute, in declaration order
    pub fn children(self) -> impl Iterator<Item = Attribute> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |attribute| attribute.parent() == Some(self))
    }

    /// Whether any attribute of the catalogue lives under this one
    pub fn has_children(self) -> bool {
        self.children().next().is_some()
    }

    /// Look up an attribute by its dotted path
    pub fn from_path(path: &str) -> Option<Attribute> {
        Self::ALL
            .iter()
            .copied()
            .find(|attribute| attribute.dotted_path() == path)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted_path())
    }
}
