//! Handler decorators: build-time wrapping of route handlers.
//!
//! A [`Decorator`] transforms a handler into a richer handler once, when
//! the router is built, so the per-request path pays nothing for the
//! composition. [`crate::router::RouterBuilder::with_global_decorator`]
//! applies a decorator chain to every registered route.

/// Transforms a handler (or any value) into a decorated form.
pub trait Decorator<In> {
    type Out;

    fn decorate(&self, raw: In) -> Self::Out;
}

pub trait DecoratorExt<In>: Decorator<In> {
    /// `self` first, then `decorator` over its output.
    fn and_then<D>(self, decorator: D) -> DecoratorComposer<Self, D>
    where
        Self: Sized,
    {
        DecoratorComposer::new(self, decorator)
    }

    /// `decorator` first, then `self` over its output.
    fn compose<D>(self, decorator: D) -> DecoratorComposer<D, Self>
    where
        Self: Sized,
    {
        DecoratorComposer::new(decorator, self)
    }
}

impl<T: Decorator<In> + ?Sized, In> DecoratorExt<In> for T {}

/// Chains two decorators.
pub struct DecoratorComposer<D1, D2> {
    decorator_1: D1,
    decorator_2: D2,
}

impl<D1, D2> DecoratorComposer<D1, D2> {
    pub fn new(decorator_1: D1, decorator_2: D2) -> Self {
        Self { decorator_1, decorator_2 }
    }
}

impl Default for DecoratorComposer<IdentityDecorator, IdentityDecorator> {
    fn default() -> Self {
        Self::new(IdentityDecorator, IdentityDecorator)
    }
}

impl<In, D1, D2> Decorator<In> for DecoratorComposer<D1, D2>
where
    D1: Decorator<In>,
    D2: Decorator<D1::Out>,
{
    type Out = D2::Out;

    fn decorate(&self, raw: In) -> Self::Out {
        let output_1 = self.decorator_1.decorate(raw);
        self.decorator_2.decorate(output_1)
    }
}

/// The do-nothing decorator every chain starts from.
#[derive(Default, Clone, Copy, Debug)]
pub struct IdentityDecorator;

impl<In> Decorator<In> for IdentityDecorator {
    type Out = In;

    #[inline(always)]
    fn decorate(&self, raw: In) -> Self::Out {
        raw
    }
}

/// A decorator backed by a plain function.
#[derive(Copy, Clone)]
pub struct DecoratorFn<F> {
    f: F,
}

pub fn decorator_fn<In, Out, F>(f: F) -> DecoratorFn<F>
where
    F: Fn(In) -> Out,
{
    DecoratorFn { f }
}

impl<In, Out, F> Decorator<In> for DecoratorFn<F>
where
    F: Fn(In) -> Out,
{
    type Out = Out;

    fn decorate(&self, raw: In) -> Self::Out {
        (self.f)(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{Decorator, DecoratorComposer, DecoratorExt, IdentityDecorator, decorator_fn};

    #[test]
    fn identity_is_a_noop() {
        assert_eq!(IdentityDecorator.decorate(41), 41);
    }

    #[test]
    fn composition_applies_in_order() {
        let chain = DecoratorComposer::new(decorator_fn(|n: i32| n + 1), decorator_fn(|n: i32| n * 2));
        assert_eq!(chain.decorate(3), 8);

        // IdentityDecorator decorates every input type, so the chaining
        // methods need the input spelled out.
        let with_identity = DecoratorExt::<i32>::and_then(IdentityDecorator, decorator_fn(|n: i32| n + 1));
        assert_eq!(with_identity.decorate(3), 4);

        let reversed = DecoratorExt::<i32>::compose(decorator_fn(|n: i32| n + 1), decorator_fn(|n: i32| n * 2));
        assert_eq!(reversed.decorate(3), 7);
    }
}
