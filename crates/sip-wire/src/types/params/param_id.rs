use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::hash::PerfectHash;

/// How the value of a known parameter is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    /// Opaque text; a quoted value is unquoted
    Text,
    /// Unsigned 32-bit integer
    Integer,
    /// Floating point value such as `q=0.7`
    Float,
    /// Presence only, a value is not allowed
    Exists,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamDef {
    pub id: ParamId,
    pub name: &'static str,
    pub kind: ParamKind,
    /// Text written back in quotes when set by the application
    pub quoted: bool,
}

macro_rules! define_params {
    ($( $variant:ident => $name:literal, $kind:ident, $quoted:literal; )*) => {
        /// Identity of a parameter known to this crate
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum ParamId {
            $( $variant, )*
        }

        const PARAM_DEFS: &[ParamDef] = &[
            $( ParamDef {
                id: ParamId::$variant,
                name: $name,
                kind: ParamKind::$kind,
                quoted: $quoted,
            }, )*
        ];

        impl ParamId {
            pub const ALL: &'static [ParamId] = &[ $( ParamId::$variant, )* ];
        }
    };
}

define_params! {
    Transport => "transport", Text, false;
    User => "user", Text, false;
    Method => "method", Text, false;
    Ttl => "ttl", Integer, false;
    Maddr => "maddr", Text, false;
    Lr => "lr", Exists, false;
    Q => "q", Float, false;
    Purpose => "purpose", Text, false;
    Handling => "handling", Text, false;
    Expires => "expires", Integer, false;
    Tag => "tag", Text, false;
    ToTag => "to-tag", Text, false;
    FromTag => "from-tag", Text, false;
    EarlyOnly => "early-only", Exists, false;
    Duration => "duration", Integer, false;
    Branch => "branch", Text, false;
    Rport => "rport", Text, false;
    Received => "received", Text, false;
    Mobility => "mobility", Text, false;
    Comp => "comp", Text, false;
    SigcompId => "sigcomp-id", Text, true;
    Id => "id", Text, false;
    Reason => "reason", Text, false;
    RetryAfter => "retry-after", Integer, false;
    Refresher => "refresher", Text, false;
    Cause => "cause", Integer, false;
    Text => "text", Text, true;
    Algorithm => "algorithm", Text, false;
    Cnonce => "cnonce", Text, true;
    Nonce => "nonce", Text, true;
    Domain => "domain", Text, true;
    Nc => "nc", Text, false;
    Opaque => "opaque", Text, true;
    Realm => "realm", Text, true;
    Username => "username", Text, true;
    Response => "response", Text, true;
    Stale => "stale", Text, false;
    Uri => "uri", Text, true;
    Qop => "qop", Text, false;
    DAlg => "d-alg", Text, false;
    DQop => "d-qop", Text, false;
    DVer => "d-ver", Text, true;
    SmimeType => "smime-type", Text, false;
    Name => "name", Text, false;
    Filename => "filename", Text, false;
    Protocol => "protocol", Text, false;
    Micalg => "micalg", Text, false;
    Boundary => "boundary", Text, false;
    Expiration => "expiration", Integer, false;
    Size => "size", Text, false;
    Permission => "permission", Text, false;
    Site => "site", Text, false;
    Directory => "directory", Text, false;
    Mode => "mode", Text, false;
    Server => "server", Text, false;
    Charset => "charset", Text, false;
    AccessType => "access-type", Text, false;
    ProfileType => "profile-type", Text, false;
    Vendor => "vendor", Text, true;
    Model => "model", Text, true;
    Version => "version", Text, true;
    EffectiveBy => "effective-by", Integer, false;
    Document => "document", Text, false;
    AppId => "app-id", Text, false;
    NetworkUser => "network-user", Text, false;
    Url => "url", Text, true;
    SipInstance => "+sip.instance", Text, true;
    RegId => "reg-id", Integer, false;
    Ob => "ob", Exists, false;
    Gruu => "gruu", Text, true;
    PubGruu => "pub-gruu", Text, true;
    TempGruu => "temp-gruu", Text, true;
    Isfocus => "isfocus", Exists, false;
    Events => "events", Text, true;
    Extensions => "extensions", Text, true;
    Schemes => "schemes", Text, true;
    Methods => "methods", Text, true;
    Description => "description", Text, true;
    Priority => "priority", Text, false;
    Language => "language", Text, true;
    Type => "type", Text, true;
    Actor => "actor", Text, true;
    Video => "video", Exists, false;
    Control => "control", Exists, false;
    Data => "data", Exists, false;
    Application => "application", Exists, false;
    Rinstance => "rinstance", Text, false;
    AddTransport => "addtransport", Exists, false;
}

static PARAM_TABLE: LazyLock<PerfectHash<ParamId>> = LazyLock::new(|| {
    let keys: Vec<(&'static str, ParamId)> = PARAM_DEFS.iter().map(|d| (d.name, d.id)).collect();
    PerfectHash::build(&keys)
});

impl ParamId {
    pub const COUNT: usize = PARAM_DEFS.len();

    /// Resolves a parameter name, ignoring case.
    pub fn lookup(name: &[u8]) -> Option<ParamId> {
        PARAM_TABLE.get(name)
    }

    pub fn def(self) -> &'static ParamDef {
        &PARAM_DEFS[self as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn canonical_name(self) -> &'static str {
        self.def().name
    }

    pub fn kind(self) -> ParamKind {
        self.def().kind
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
