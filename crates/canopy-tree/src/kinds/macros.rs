//! Declarative generators for the typed node API.
//!
//! * `node_kinds!` declares the kind hierarchy: the `NodeKind` enum, the
//!   `Transformer` trait with one `transform_<kind>` method per kind, and
//!   `dispatch_transform`.
//! * `capabilities!` declares one trait per capability, with accessors and
//!   replacers for the capability's fields.
//! * `typed_nodes!` declares one wrapper per kind, implementing
//!   `TreeNode`, its capability traits and accessors for its other fields.
//!
//! Field shapes: `node`, `optional_node`, `nodes`, `symbol`,
//! `optional_symbol`, `value`, `optional_value`, `lateinit_value`, `flag`.
//! A field marked `#[replace]` also gets a `replace_<field>` method. A
//! `lateinit_value` field has a fallible getter and an `initialize_<field>`
//! setter.

/// Helper macro for accessor generation.
#[doc(hidden)]
#[macro_export]
macro_rules! node_field {
    (@flag [replace]) => {
        true
    };
    (@flag []) => {
        false
    };

    (@arg node) => {
        $crate::NodeRef
    };
    (@arg optional_node) => {
        Option<$crate::NodeRef>
    };
    (@arg nodes) => {
        Vec<$crate::NodeRef>
    };
    (@arg symbol) => {
        $crate::SymbolId
    };
    (@arg optional_symbol) => {
        Option<$crate::SymbolId>
    };
    (@arg value) => {
        $crate::Value
    };
    (@arg optional_value) => {
        Option<$crate::Value>
    };
    (@arg lateinit_value) => {
        $crate::Value
    };
    (@arg flag) => {
        bool
    };

    (@getter $vis:vis $field:ident : node) => {
        $vis fn $field(&self, ctx: &$crate::TreeContext) -> $crate::NodeRef {
            ctx.child($crate::TreeNode::node(self), stringify!($field))
        }
    };
    (@getter $vis:vis $field:ident : optional_node) => {
        $vis fn $field(&self, ctx: &$crate::TreeContext) -> Option<$crate::NodeRef> {
            ctx.optional_child($crate::TreeNode::node(self), stringify!($field))
        }
    };
    (@getter $vis:vis $field:ident : nodes) => {
        $vis fn $field<'a>(&self, ctx: &'a $crate::TreeContext) -> &'a [$crate::NodeRef] {
            ctx.children($crate::TreeNode::node(self), stringify!($field))
        }
    };
    (@getter $vis:vis $field:ident : symbol) => {
        $vis fn $field(&self, ctx: &$crate::TreeContext) -> $crate::SymbolId {
            ctx.symbol_field($crate::TreeNode::node(self), stringify!($field))
        }
    };
    (@getter $vis:vis $field:ident : optional_symbol) => {
        $vis fn $field(&self, ctx: &$crate::TreeContext) -> Option<$crate::SymbolId> {
            ctx.optional_symbol($crate::TreeNode::node(self), stringify!($field))
        }
    };
    (@getter $vis:vis $field:ident : value) => {
        $vis fn $field<'a>(&self, ctx: &'a $crate::TreeContext) -> &'a $crate::Value {
            ctx.value_field($crate::TreeNode::node(self), stringify!($field))
        }
    };
    (@getter $vis:vis $field:ident : optional_value) => {
        $vis fn $field<'a>(&self, ctx: &'a $crate::TreeContext) -> Option<&'a $crate::Value> {
            ctx.optional_value($crate::TreeNode::node(self), stringify!($field))
        }
    };
    (@getter $vis:vis $field:ident : lateinit_value) => {
        $vis fn $field<'a>(
            &self,
            ctx: &'a $crate::TreeContext,
        ) -> $crate::TreeResult<&'a $crate::Value> {
            ctx.lateinit_value($crate::TreeNode::node(self), stringify!($field))
        }

        $crate::paste::paste! {
            $vis fn [<initialize_ $field>](
                &self,
                ctx: &mut $crate::TreeContext,
                value: $crate::Value,
            ) -> $crate::TreeResult<()> {
                ctx.initialize($crate::TreeNode::node(self), stringify!($field), value)
            }
        }
    };
    (@getter $vis:vis $field:ident : flag) => {
        $vis fn $field(&self, ctx: &$crate::TreeContext) -> bool {
            ctx.flag($crate::TreeNode::node(self), stringify!($field))
        }
    };

    (@replacer [] $vis:vis $field:ident : $shape:ident) => {};
    (@replacer [replace] $vis:vis $field:ident : $shape:ident) => {
        $crate::paste::paste! {
            $vis fn [<replace_ $field>](
                &self,
                ctx: &mut $crate::TreeContext,
                value: $crate::node_field!(@arg $shape),
            ) -> $crate::TreeResult<()> {
                ctx.replace($crate::TreeNode::node(self), stringify!($field), value)
                    .map(drop)
            }
        }
    };
}

/// Declare the kind hierarchy, rooted at one kind.
///
/// ```ignore
/// node_kinds! {
///     root Element;
///     Expression: Element;
///     Block: Expression;
/// }
/// ```
#[macro_export]
macro_rules! node_kinds {
    (root $root:ident; $($kind:ident : $parent:ident;)*) => {
        $crate::paste::paste! {
            /// Every kind known to the generated API.
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub enum NodeKind {
                $root,
                $($kind,)*
            }

            impl NodeKind {
                pub const ALL: &'static [NodeKind] = &[NodeKind::$root, $(NodeKind::$kind,)*];

                pub fn name(self) -> &'static str {
                    match self {
                        NodeKind::$root => stringify!($root),
                        $(NodeKind::$kind => stringify!($kind),)*
                    }
                }

                pub fn parent(self) -> Option<NodeKind> {
                    match self {
                        NodeKind::$root => None,
                        $(NodeKind::$kind => Some(NodeKind::$parent),)*
                    }
                }

                pub fn from_name(name: &str) -> Option<NodeKind> {
                    Self::ALL.iter().copied().find(|kind| kind.name() == name)
                }
            }

            /// Per-kind transformation hooks.
            ///
            /// Each method defaults to the method of the parent kind; the
            /// root method transforms the node's children and keeps the node.
            pub trait Transformer<D> {
                fn [<transform_ $root:snake>](
                    &mut self,
                    ctx: &mut $crate::TreeContext,
                    node: $crate::NodeRef,
                    data: &mut D,
                ) -> $crate::TreeResult<$crate::NodeRef> {
                    $crate::transform_children(ctx, node, self, data)?;
                    Ok(node)
                }

                $(
                    fn [<transform_ $kind:snake>](
                        &mut self,
                        ctx: &mut $crate::TreeContext,
                        node: $crate::NodeRef,
                        data: &mut D,
                    ) -> $crate::TreeResult<$crate::NodeRef> {
                        self.[<transform_ $parent:snake>](ctx, node, data)
                    }
                )*
            }

            /// Route `node` to the most specific `transform_<kind>` method.
            /// Kinds outside the generated API go to the root method.
            pub fn dispatch_transform<D, T>(
                ctx: &mut $crate::TreeContext,
                node: $crate::NodeRef,
                transformer: &mut T,
                data: &mut D,
            ) -> $crate::TreeResult<$crate::NodeRef>
            where
                T: Transformer<D> + ?Sized,
            {
                match ctx.node_kind(node) {
                    Some(NodeKind::$root) | None => {
                        transformer.[<transform_ $root:snake>](ctx, node, data)
                    }
                    $(
                        Some(NodeKind::$kind) => {
                            transformer.[<transform_ $kind:snake>](ctx, node, data)
                        }
                    )*
                }
            }
        }
    };
}

/// Declare capability traits.
#[macro_export]
macro_rules! capabilities {
    ($(
        $(#[doc = $doc:literal])*
        $cap:ident {
            $($(#[$flag:ident])? $field:ident : $shape:ident),* $(,)?
        }
    )*) => {
        $(
            $(#[doc = $doc])*
            pub trait $cap: $crate::TreeNode {
                $(
                    $crate::node_field!(@getter $field : $shape);
                    $crate::node_field!(@replacer [$($flag)?] $field : $shape);
                )*
            }
        )*

        /// Accessors emitted for each capability trait.
        pub fn capability_surface() -> Vec<$crate::ApiSurface> {
            vec![$(
                $crate::ApiSurface {
                    name: stringify!($cap),
                    capabilities: Vec::new(),
                    fields: vec![$(
                        $crate::FieldSurface {
                            name: stringify!($field),
                            shape: stringify!($shape),
                            replace: $crate::node_field!(@flag [$($flag)?]),
                        }
                    ),*],
                }
            ),*]
        }
    };
}

/// Declare typed wrappers for node kinds.
///
/// The capability list names every capability the kind composes, inherited
/// ones included. The field list covers every composed field that no
/// capability contributes.
#[macro_export]
macro_rules! typed_nodes {
    ($(
        $(#[doc = $doc:literal])*
        $kind:ident [$($cap:ident),* $(,)?] {
            $($(#[$flag:ident])? $field:ident : $shape:ident),* $(,)?
        }
    )*) => {
        $(
            $(#[doc = $doc])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
            pub struct $kind($crate::NodeRef);

            impl $crate::TreeNode for $kind {
                const KIND: &'static str = stringify!($kind);

                fn from_raw(node: $crate::NodeRef) -> Self {
                    $kind(node)
                }

                fn node(&self) -> $crate::NodeRef {
                    self.0
                }
            }

            $(impl $cap for $kind {})*

            impl $kind {
                $(
                    $crate::node_field!(@getter pub $field : $shape);
                    $crate::node_field!(@replacer [$($flag)?] pub $field : $shape);
                )*
            }
        )*

        /// Accessors emitted for each typed wrapper.
        pub fn api_surface() -> Vec<$crate::ApiSurface> {
            vec![$(
                $crate::ApiSurface {
                    name: stringify!($kind),
                    capabilities: vec![$(stringify!($cap)),*],
                    fields: vec![$(
                        $crate::FieldSurface {
                            name: stringify!($field),
                            shape: stringify!($shape),
                            replace: $crate::node_field!(@flag [$($flag)?]),
                        }
                    ),*],
                }
            ),*]
        }
    };
}
