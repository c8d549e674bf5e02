use darling::{
    FromDeriveInput, FromField, FromMeta,
    ast::Data,
    util::{Flag, Override},
};
use proc_macro_error2::{abort, emit_error};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, Ident, Type, Visibility, parse2};

/// Type names whose values hold many elements. A foreign key on such a member is resolved
/// through another table.
const COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "HashMap",
    "BTreeMap",
    "BinaryHeap",
];

#[derive(FromMeta, Debug, Clone, Default)]
struct ForeignKeyArgs {
    assignment_table: Option<String>,
    remote_column: Option<String>,
}

#[derive(FromField, Debug, Clone)]
#[darling(attributes(keel))]
struct DeriveModelField {
    ident: Option<Ident>,
    ty: Type,
    vis: Visibility,
    ignore: Flag,
    field: Flag,
    column: Option<String>,
    column_type: Option<Type>,
    nullable: Flag,
    primary_key: Flag,
    foreign_key: Option<Override<ForeignKeyArgs>>,
}

#[derive(FromDeriveInput)]
#[darling(attributes(keel))]
struct DeriveModelTarget {
    ident: Ident,
    generics: Generics,
    entity: Flag,
    table: Option<String>,
    data: Data<(), DeriveModelField>,
}

#[derive(Clone)]
enum TargetKind {
    Plain,
    PrimaryKey,
    ForeignKey(ForeignKeyArgs),
}

#[derive(Clone)]
struct TargetFieldMarker {
    column: Option<String>,
    column_type: Option<Type>,
    nullable: bool,
    kind: TargetKind,
}

#[derive(Clone)]
struct TargetMember {
    field_ident: Ident,
    ty: Type,
    public: bool,
    collection: bool,
    ignore: bool,
    marker: Option<TargetFieldMarker>,
}

impl TargetMember {
    /// The column name this member ends up with, if it is stored in the entity's own table.
    fn internal_column(&self) -> Option<String> {
        if self.ignore {
            return None;
        }

        match &self.marker {
            Some(marker) => {
                if matches!(marker.kind, TargetKind::ForeignKey(_)) && self.collection {
                    None
                } else {
                    Some(
                        marker
                            .column
                            .clone()
                            .unwrap_or_else(|| self.field_ident.to_string()),
                    )
                }
            }
            None if self.public => Some(self.field_ident.to_string()),
            None => None,
        }
    }
}

fn is_collection(ty: &Type) -> bool {
    match ty {
        Type::Array(_) | Type::Slice(_) => true,
        Type::Group(e) => is_collection(&e.elem),
        Type::Paren(e) => is_collection(&e.elem),
        Type::Reference(e) => is_collection(&e.elem),
        Type::Path(e) => e
            .path
            .segments
            .last()
            .is_some_and(|s| COLLECTIONS.iter().any(|c| s.ident == c)),
        _ => false,
    }
}

fn target_member(field: &DeriveModelField) -> TargetMember {
    let Some(field_ident) = &field.ident else {
        abort! {
            field.ty, "Field has no ident.";
            note = "This macro cannot be run on tuple structs.";
        };
    };

    if field.primary_key.is_present() && field.foreign_key.is_some() {
        abort! {
            field.primary_key.span(), "Field \"{}\" is marked as both primary key and foreign key.", field_ident;
            note = "A primary key is always a local column; remove either `primary_key` or `foreign_key`.";
        };
    }

    let kind = if field.primary_key.is_present() {
        TargetKind::PrimaryKey
    } else if let Some(foreign_key) = &field.foreign_key {
        TargetKind::ForeignKey(match foreign_key {
            Override::Inherit => ForeignKeyArgs::default(),
            Override::Explicit(e) => e.clone(),
        })
    } else {
        TargetKind::Plain
    };

    let marked = field.field.is_present()
        || field.column.is_some()
        || field.column_type.is_some()
        || field.nullable.is_present()
        || !matches!(kind, TargetKind::Plain);

    TargetMember {
        field_ident: field_ident.clone(),
        ty: field.ty.clone(),
        public: matches!(field.vis, Visibility::Public(_)),
        collection: is_collection(&field.ty),
        ignore: field.ignore.is_present(),
        marker: marked.then(|| TargetFieldMarker {
            column: field.column.clone(),
            column_type: field.column_type.clone(),
            nullable: field.nullable.is_present(),
            kind,
        }),
    }
}

fn quote_option_string(value: Option<&String>) -> TokenStream {
    match value {
        Some(e) => quote! { ::std::option::Option::Some(::std::string::String::from(#e)) },
        None => quote! { ::std::option::Option::None },
    }
}

fn quote_markers(member: &TargetMember) -> TokenStream {
    let ignore = member.ignore;

    let field = match &member.marker {
        Some(marker) => {
            let column_name = quote_option_string(marker.column.as_ref());
            let column_type = match &marker.column_type {
                Some(ty) => quote! {
                    ::std::option::Option::Some(::keel_orm::entity::ValueType::of::<#ty>())
                },
                None => quote! { ::std::option::Option::None },
            };
            let nullable = marker.nullable;
            let kind = match &marker.kind {
                TargetKind::Plain => quote! { ::keel_orm::entity::marker::FieldKind::Plain },
                TargetKind::PrimaryKey => {
                    quote! { ::keel_orm::entity::marker::FieldKind::PrimaryKey }
                }
                TargetKind::ForeignKey(link) => {
                    let assignment_table = quote_option_string(link.assignment_table.as_ref());
                    let remote_column = quote_option_string(link.remote_column.as_ref());

                    quote! {
                        ::keel_orm::entity::marker::FieldKind::ForeignKey(
                            ::keel_orm::entity::marker::ForeignKeyMarker {
                                assignment_table: #assignment_table,
                                remote_column: #remote_column,
                            }
                        )
                    }
                }
            };

            quote! {
                ::std::option::Option::Some(::keel_orm::entity::marker::FieldMarker {
                    column_name: #column_name,
                    column_type: #column_type,
                    nullable: #nullable,
                    kind: #kind,
                })
            }
        }
        None => quote! { ::std::option::Option::None },
    };

    quote! {
        ::keel_orm::entity::marker::Markers {
            ignore: #ignore,
            field: #field,
        }
    }
}

pub fn derive_database_model(input: TokenStream) -> TokenStream {
    let input: DeriveInput = parse2(input).expect("Failed to parse derive input");

    let target = match DeriveModelTarget::from_derive_input(&input) {
        Ok(r) => r,
        Err(e) => return e.write_errors(),
    };

    let Some(struct_data) = target.data.take_struct() else {
        abort! {
            input, "Target is not a struct.";
            note = "This macro must be run on a struct.";
        };
    };

    if !target.generics.params.is_empty() {
        abort! {
            target.generics, "Generic models are not supported.";
            note = "Each table needs exactly one concrete model type.";
        };
    }

    let members = struct_data
        .fields
        .iter()
        .map(target_member)
        .collect::<Vec<_>>();

    // Make sure all internal columns have unique names. Lookups ignore case, so must this.
    let columns = members
        .iter()
        .filter_map(|e| e.internal_column().map(|c| (e, c.to_uppercase())))
        .collect::<Vec<_>>();

    if let Some((duplicate, _)) = columns
        .iter()
        .find(|(_, e)| columns.iter().filter(|(_, o)| e.eq(o)).count() > 1)
    {
        columns.iter().for_each(|(member, column)| {
            if columns.iter().filter(|(_, o)| column.eq(o)).count() > 1 {
                emit_error! {
                    member.field_ident.span(), "Clashing occurrence of \"{}\" here.", column
                };
            }
        });

        abort! {
            duplicate.field_ident.span(), "Duplicate column definition \"{}\"", duplicate.internal_column().unwrap_or_default();
            note = "Columns must have unique names (ignoring case), if necessary use the #[keel(column = \"my_column_name\")] attribute to specify a unique name.";
        }
    }

    let model_ident = &target.ident;
    let model_name = model_ident.to_string();

    let entity_marker = if target.entity.is_present() || target.table.is_some() {
        let table_name = quote_option_string(target.table.as_ref());

        quote! {
            ::std::option::Option::Some(::keel_orm::entity::marker::EntityMarker {
                table_name: #table_name,
            })
        }
    } else {
        quote! { ::std::option::Option::None }
    };

    let member_decls = members.iter().map(|e| {
        let ident = &e.field_ident;
        let name = ident.to_string();
        let ty = &e.ty;
        let collection = e.collection;
        let public = e.public;
        let markers = quote_markers(e);

        quote! {
            ::keel_orm::entity::member::Member::new(
                #name,
                ::keel_orm::entity::ValueType::of::<#ty>(),
                ::keel_orm::entity::member::MemberHandle::new(
                    |m: &Self| &m.#ident,
                    |m: &mut Self, v| {
                        m.#ident = *v.downcast::<#ty>()?;
                        ::std::result::Result::Ok(())
                    },
                ),
            )
            .collection(#collection)
            .public(#public)
            .markers(#markers)
        }
    });

    quote! {
        impl ::keel_orm::entity::Model for #model_ident {
            const NAME: &'static str = #model_name;

            fn entity_marker() -> ::std::option::Option<::keel_orm::entity::marker::EntityMarker> {
                #entity_marker
            }

            fn members() -> ::std::vec::Vec<::keel_orm::entity::member::Member<Self>> {
                ::std::vec![
                    #(
                        #member_decls
                    ),*
                ]
            }
        }
    }
}

#[cfg(test)]
mod test {
    use syn::{Type, parse_quote};

    use super::is_collection;

    #[test]
    fn test_is_collection() {
        let collections: [Type; 5] = [
            parse_quote!(Vec<Order>),
            parse_quote!(std::collections::HashSet<i32>),
            parse_quote!(BTreeMap<String, Order>),
            parse_quote!([u8; 4]),
            parse_quote!(&'static [Order]),
        ];
        let scalars: [Type; 4] = [
            parse_quote!(String),
            parse_quote!(Option<Vec<Order>>),
            parse_quote!(i64),
            parse_quote!((i32, i32)),
        ];

        assert!(collections.iter().all(is_collection));
        assert!(!scalars.iter().any(is_collection));
    }
}
