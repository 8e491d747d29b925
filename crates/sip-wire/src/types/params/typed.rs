use ordered_float::NotNan;

use super::param_id::{ParamId, ParamKind};
use super::registry::ParamValue;

/// Rust type a parameter kind decodes to.
pub trait ParamValueType: Sized + 'static {
    const KIND: ParamKind;

    fn project(value: &mut ParamValue) -> Option<&mut Self>;
}

impl ParamValueType for String {
    const KIND: ParamKind = ParamKind::Text;

    fn project(value: &mut ParamValue) -> Option<&mut Self> {
        match value {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl ParamValueType for u32 {
    const KIND: ParamKind = ParamKind::Integer;

    fn project(value: &mut ParamValue) -> Option<&mut Self> {
        match value {
            ParamValue::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl ParamValueType for NotNan<f32> {
    const KIND: ParamKind = ParamKind::Float;

    fn project(value: &mut ParamValue) -> Option<&mut Self> {
        match value {
            ParamValue::Float(q) => Some(q),
            _ => None,
        }
    }
}

impl ParamValueType for () {
    const KIND: ParamKind = ParamKind::Exists;

    fn project(value: &mut ParamValue) -> Option<&mut Self> {
        match value {
            ParamValue::Exists(unit) => Some(unit),
            _ => None,
        }
    }
}

/// A statically typed parameter, see the markers in [`p`].
pub trait ParamType: Copy {
    const ID: ParamId;
    type Value: ParamValueType;
}

macro_rules! param_types {
    ($( $marker:ident => $id:ident, $value:ty; )*) => {
        /// Typed parameter markers for use with `ParameterList::param`
        pub mod p {
            use super::*;

            $(
                #[derive(Debug, Clone, Copy, PartialEq, Eq)]
                pub struct $marker;

                impl ParamType for $marker {
                    const ID: ParamId = ParamId::$id;
                    type Value = $value;
                }

                impl From<$marker> for ParamId {
                    fn from(_: $marker) -> ParamId {
                        ParamId::$id
                    }
                }
            )*
        }

        #[cfg(test)]
        const MARKER_KINDS: &[(ParamId, ParamKind)] = &[
            $( (ParamId::$id, <$value as ParamValueType>::KIND), )*
        ];
    };
}

param_types! {
    Transport => Transport, String;
    User => User, String;
    Method => Method, String;
    Ttl => Ttl, u32;
    Maddr => Maddr, String;
    Lr => Lr, ();
    Q => Q, NotNan<f32>;
    Purpose => Purpose, String;
    Handling => Handling, String;
    Expires => Expires, u32;
    Tag => Tag, String;
    ToTag => ToTag, String;
    FromTag => FromTag, String;
    EarlyOnly => EarlyOnly, ();
    Duration => Duration, u32;
    Branch => Branch, String;
    Rport => Rport, String;
    Received => Received, String;
    Mobility => Mobility, String;
    Comp => Comp, String;
    SigcompId => SigcompId, String;
    Id => Id, String;
    Reason => Reason, String;
    RetryAfter => RetryAfter, u32;
    Refresher => Refresher, String;
    Cause => Cause, u32;
    Text => Text, String;
    Algorithm => Algorithm, String;
    Cnonce => Cnonce, String;
    Nonce => Nonce, String;
    Domain => Domain, String;
    Nc => Nc, String;
    Opaque => Opaque, String;
    Realm => Realm, String;
    Username => Username, String;
    Response => Response, String;
    Stale => Stale, String;
    Uri => Uri, String;
    Qop => Qop, String;
    DAlg => DAlg, String;
    DQop => DQop, String;
    DVer => DVer, String;
    SmimeType => SmimeType, String;
    Name => Name, String;
    Filename => Filename, String;
    Protocol => Protocol, String;
    Micalg => Micalg, String;
    Boundary => Boundary, String;
    Expiration => Expiration, u32;
    Size => Size, String;
    Permission => Permission, String;
    Site => Site, String;
    Directory => Directory, String;
    Mode => Mode, String;
    Server => Server, String;
    Charset => Charset, String;
    AccessType => AccessType, String;
    ProfileType => ProfileType, String;
    Vendor => Vendor, String;
    Model => Model, String;
    Version => Version, String;
    EffectiveBy => EffectiveBy, u32;
    Document => Document, String;
    AppId => AppId, String;
    NetworkUser => NetworkUser, String;
    Url => Url, String;
    SipInstance => SipInstance, String;
    RegId => RegId, u32;
    Ob => Ob, ();
    Gruu => Gruu, String;
    PubGruu => PubGruu, String;
    TempGruu => TempGruu, String;
    Isfocus => Isfocus, ();
    Events => Events, String;
    Extensions => Extensions, String;
    Schemes => Schemes, String;
    Methods => Methods, String;
    Description => Description, String;
    Priority => Priority, String;
    Language => Language, String;
    Type => Type, String;
    Actor => Actor, String;
    Video => Video, ();
    Control => Control, ();
    Data => Data, ();
    Application => Application, ();
    Rinstance => Rinstance, String;
    AddTransport => AddTransport, ();
}
