//! Tuple extraction, so a handler can take any mix of extractors.
//!
//! Each arity gets its own `Either*` error enum: the first extractor to
//! fail decides the response, carried through its own variant.

use crate::body::OptionReqBody;
use crate::body::ResponseBody;
use crate::extract::from_request::FromRequest;
use crate::request::RequestContext;
use crate::responder::Responder;
use async_trait::async_trait;
use http::Response;

macro_rules! impl_from_request_for_tuple {
    ($either:ident, $($param:ident)*) => {
        #[async_trait]
        impl<$($param,)*> FromRequest for ($($param,)*)
        where
            $($param: FromRequest,)*
            $(for <'any> $param::Output<'any>: Send,)*
        {
            type Output<'r> = ($($param::Output<'r>,)*);
            type Error = $either<$($param::Error,)*>;

            #[allow(non_snake_case)]
            async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: OptionReqBody) -> Result<Self::Output<'r>, Self::Error> {
                Ok(($($param::from_request(req, body.clone()).await.map_err($either::$param)?,)*))
            }
        }

        pub enum $either<$($param,)*> {
            $(
            $param($param),
            )*
        }

        impl<$($param,)*> Responder for $either<$($param,)*>
            where
                $(
                $param: Responder,
                )*
        {
            #[allow(non_snake_case)]
            fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
                match self {
                    $(
                        $either::$param($param) => $param.response_to(req),
                    )*
                }
            }
        }
    }
}

impl_from_request_for_tuple! { EitherA, A }
impl_from_request_for_tuple! { EitherAB, A B}
impl_from_request_for_tuple! { EitherABC, A B C}
impl_from_request_for_tuple! { EitherABCD, A B C D }
impl_from_request_for_tuple! { EitherABCDE, A B C D E }
impl_from_request_for_tuple! { EitherABCDEF, A B C D E F }
impl_from_request_for_tuple! { EitherABCDEFG, A B C D E F G }
impl_from_request_for_tuple! { EitherABCDEFGH, A B C D E F G H }
impl_from_request_for_tuple! { EitherABCDEFGHI, A B C D E F G H I }
impl_from_request_for_tuple! { EitherABCDEFGHIJ, A B C D E F G H I J }
impl_from_request_for_tuple! { EitherABCDEFGHIJK, A B C D E F G H I J K }
impl_from_request_for_tuple! { EitherABCDEFGHIJKL, A B C D E F G H I J K L }
