use std::future::Future;

/// Represents an async function over a tuple of arguments.
///
/// Handlers of any arity are funneled through this single trait so the
/// rest of the framework can treat them uniformly. The returned future
/// is `Send` so handlers can run on a multi-threaded runtime.
pub trait FnTrait<Args> {
    type Output;
    fn call(&self, args: Args) -> impl Future<Output = Self::Output> + Send;
}

/// impl `FnTrait` for plain async `Fn`s, from 0 up to 12 parameters.
///
/// for example, it will impl Fn(A, B) like this:
///```ignore
/// impl<Func, Fut, A, B> FnTrait<(A, B)> for Func
///    where
///        Func: Fn(A, B) -> Fut,
///        Fut: std::future::Future,
/// {
///    type Output = Fut::Output;
///
///    #[inline]
///    #[allow(non_snake_case)]
///    async fn call(&self, (A, B): (A, B)) -> Self::Output {
///        (self)(A, B)
///    }
/// }
///```
macro_rules! impl_fn_trait_for_fn ({ $($param:ident)* } => {
    impl<Func, Fut, $($param,)*> FnTrait<($($param,)*)> for Func
    where
        Func: Fn($($param),*) -> Fut,
        Fut: std::future::Future + Send,
    {
        type Output = Fut::Output;

        #[inline]
        #[allow(non_snake_case)]
        fn call(&self, ($($param,)*): ($($param,)*)) -> impl std::future::Future<Output = Self::Output> + Send {
            (self)($($param,)*)
        }
    }
});

impl_fn_trait_for_fn! {}
impl_fn_trait_for_fn! { A }
impl_fn_trait_for_fn! { A B }
impl_fn_trait_for_fn! { A B C }
impl_fn_trait_for_fn! { A B C D }
impl_fn_trait_for_fn! { A B C D E }
impl_fn_trait_for_fn! { A B C D E F }
impl_fn_trait_for_fn! { A B C D E F G }
impl_fn_trait_for_fn! { A B C D E F G H }
impl_fn_trait_for_fn! { A B C D E F G H I }
impl_fn_trait_for_fn! { A B C D E F G H I J }
impl_fn_trait_for_fn! { A B C D E F G H I J K }
impl_fn_trait_for_fn! { A B C D E F G H I J K L }
