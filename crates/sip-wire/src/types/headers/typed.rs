//! Typed header markers
//!
//! Each marker in [`h`] ties a [`HeaderId`] to the structured type its
//! values decode to, and to the accessor that may be used with it:
//! single-value headers implement [`SingleHeader`] and are read with
//! `Message::header`, multi-value headers implement [`MultiHeader`] and are
//! read with `Message::header_multi`. Multi-value markers use plural names,
//! so `h::Vias` is the Via header as a list.

use crate::types::category::ParserCategory;
use crate::types::headers::header_id::HeaderId;

use crate::types::auth::Auth;
use crate::types::call_id::CallIdCategory;
use crate::types::cseq::CSeqCategory;
use crate::types::date::DateCategory;
use crate::types::generic_uri::GenericUri;
use crate::types::mime::Mime;
use crate::types::name_addr::NameAddr;
use crate::types::rack::RAckCategory;
use crate::types::string_category::StringCategory;
use crate::types::token::Token;
use crate::types::uint32::UInt32Category;
use crate::types::via::Via;
use crate::types::warning::WarningCategory;

pub trait HeaderType: Copy {
    const ID: HeaderId;
    type Value: ParserCategory;
}

/// A header that occurs at most once.
pub trait SingleHeader: HeaderType {}

/// A header that may occur any number of times.
pub trait MultiHeader: HeaderType {}

macro_rules! header_types {
    ($( $arity:ident $marker:ident => $id:ident, $value:ty; )*) => {
        /// Typed header markers
        pub mod h {
            use super::*;

            $(
                #[derive(Debug, Clone, Copy, PartialEq, Eq)]
                pub struct $marker;

                impl HeaderType for $marker {
                    const ID: HeaderId = HeaderId::$id;
                    type Value = $value;
                }

                header_types!(@arity $arity $marker);

                // `h::From` shadows the prelude trait in this module
                impl ::core::convert::From<$marker> for HeaderId {
                    fn from(_: $marker) -> HeaderId {
                        HeaderId::$id
                    }
                }
            )*
        }

        #[cfg(test)]
        const MARKERS: &[(HeaderId, bool, crate::types::category::FieldKind)] = &[
            $( (HeaderId::$id, header_types!(@multi $arity), <$value as ParserCategory>::KIND), )*
        ];
    };
    (@arity single $marker:ident) => { impl SingleHeader for $marker {} };
    (@arity multi $marker:ident) => { impl MultiHeader for $marker {} };
    (@multi single) => { false };
    (@multi multi) => { true };
}

header_types! {
    multi Vias => Via, Via;
    single MaxForwards => MaxForwards, UInt32Category;
    multi Routes => Route, NameAddr;
    multi RecordRoutes => RecordRoute, NameAddr;
    multi Paths => Path, NameAddr;
    multi ServiceRoutes => ServiceRoute, NameAddr;
    multi ProxyRequires => ProxyRequire, Token;
    multi Requires => Require, Token;
    multi Supporteds => Supported, Token;
    multi Unsupporteds => Unsupported, Token;
    multi Allows => Allow, Token;
    multi AllowEvents => AllowEvents, Token;
    multi Accepts => Accept, Mime;
    multi AcceptEncodings => AcceptEncoding, Token;
    multi AcceptLanguages => AcceptLanguage, Token;
    multi ContentLanguages => ContentLanguage, Token;
    single ContentDisposition => ContentDisposition, Token;
    single ContentEncoding => ContentEncoding, Token;
    single ContentType => ContentType, Mime;
    single ContentLength => ContentLength, UInt32Category;
    single MimeVersion => MimeVersion, Token;
    single CallId => CallId, CallIdCategory;
    single CSeq => CSeq, CSeqCategory;
    single From => From, NameAddr;
    single To => To, NameAddr;
    multi Contacts => Contact, NameAddr;
    single ReplyTo => ReplyTo, NameAddr;
    single ReferTo => ReferTo, NameAddr;
    single ReferredBy => ReferredBy, NameAddr;
    single Expires => Expires, UInt32Category;
    single MinExpires => MinExpires, UInt32Category;
    single SessionExpires => SessionExpires, UInt32Category;
    single MinSE => MinSE, UInt32Category;
    single RSeq => RSeq, UInt32Category;
    single RAck => RAck, RAckCategory;
    single RetryAfter => RetryAfter, UInt32Category;
    single Date => Date, DateCategory;
    single Timestamp => Timestamp, StringCategory;
    single Subject => Subject, StringCategory;
    single Server => Server, StringCategory;
    single UserAgent => UserAgent, StringCategory;
    single Organization => Organization, StringCategory;
    single Priority => Priority, Token;
    single Event => Event, Token;
    single SubscriptionState => SubscriptionState, Token;
    multi InReplyTo => InReplyTo, CallIdCategory;
    single Replaces => Replaces, CallIdCategory;
    multi Warnings => Warning, WarningCategory;
    multi CallInfos => CallInfo, GenericUri;
    multi AlertInfos => AlertInfo, GenericUri;
    multi ErrorInfos => ErrorInfo, GenericUri;
    multi Authorizations => Authorization, Auth;
    multi ProxyAuthorizations => ProxyAuthorization, Auth;
    multi WwwAuthenticates => WwwAuthenticate, Auth;
    multi ProxyAuthenticates => ProxyAuthenticate, Auth;
    single AuthenticationInfo => AuthenticationInfo, Auth;
    multi Reasons => Reason, Token;
    multi Privacies => Privacy, Token;
    multi PAssertedIdentities => PAssertedIdentity, NameAddr;
    multi PPreferredIdentities => PPreferredIdentity, NameAddr;
    single SipETag => SipETag, Token;
    single SipIfMatch => SipIfMatch, Token;
}
