use super::{
    name, AssociationSpec, ComponentBinding, ComponentSpec, DeclaredAttribute, DeclaredType,
    FieldBinding, FieldSpec, ManyToMany, ManyToOne, MappingDescriptor, MappingSpec, Multiplicity,
    OneToMany, PrimaryKey, TypeSource,
};
use crate::{stmt::Type, Error, Result};

use indexmap::IndexMap;

/// Turns a (possibly absent) [`MappingSpec`] into a [`MappingDescriptor`].
///
/// Defaults only fill omitted parts of the specification:
///
/// * table name = class name
/// * column name = attribute name
/// * many-to-one foreign key = `<attribute>_id`
/// * one-to-many inverse column = `<owner class lowercased>_id`
/// * many-to-many join table = `<Owner>_<Target>`, with columns
///   `<Owner>_id` / `<Target>_id`
///
/// Types missing from the specification come from the optional
/// [`TypeSource`]. Resolution is a pure function of its inputs.
#[derive(Default, Clone, Copy)]
pub struct Resolver<'a> {
    types: Option<&'a dyn TypeSource>,
    table_name_prefix: Option<&'a str>,
}

/// Per-class resolution state.
struct ResolveClass<'a, 'b> {
    resolver: &'b Resolver<'a>,
    class: &'b str,
    declared: IndexMap<String, DeclaredAttribute>,
    is_known: &'b dyn Fn(&str) -> bool,
}

impl<'a> Resolver<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types(mut self, types: &'a dyn TypeSource) -> Self {
        self.types = Some(types);
        self
    }

    /// Prefix every table and join-table name with `prefix`.
    pub fn table_name_prefix(mut self, prefix: &'a str) -> Self {
        self.table_name_prefix = Some(prefix);
        self
    }

    /// Resolves `class`. Without a specification the whole mapping is
    /// derived from the declared attributes of the class.
    ///
    /// `is_known` answers whether an association target has (or is about to
    /// have) a descriptor of its own.
    pub fn resolve(
        &self,
        class: &str,
        spec: Option<&MappingSpec>,
        is_known: &dyn Fn(&str) -> bool,
    ) -> Result<MappingDescriptor> {
        let declared = self.declared(class);

        let derived;
        let spec = match spec {
            Some(spec) => spec,
            None => {
                let Some(attributes) = &declared else {
                    return Err(Error::missing_declared_attributes(class));
                };
                derived = MappingSpec::from_declared(class, attributes)?;
                &derived
            }
        };

        let cx = ResolveClass {
            resolver: self,
            class,
            declared: index(declared.unwrap_or_default()),
            is_known,
        };

        let descriptor = cx.resolve(spec)?;
        descriptor.verify()?;
        Ok(descriptor)
    }

    fn declared(&self, class: &str) -> Option<Vec<DeclaredAttribute>> {
        self.types?.declared_attributes(class)
    }

    fn table_name(&self, table: String) -> String {
        match self.table_name_prefix {
            Some(prefix) => format!("{prefix}{table}"),
            None => table,
        }
    }
}

impl ResolveClass<'_, '_> {
    fn resolve(&self, spec: &MappingSpec) -> Result<MappingDescriptor> {
        let primary_key = self.primary_key(spec)?;

        let fields = spec
            .fields
            .iter()
            .filter(|field| field.attribute != primary_key.attribute)
            .map(|field| {
                let column = field
                    .column
                    .clone()
                    .unwrap_or_else(|| name::column(&field.attribute));
                self.field(self.class, field, &self.declared, column)
            })
            .collect::<Result<Vec<_>>>()?;

        let components = spec
            .components
            .iter()
            .map(|component| {
                self.component(
                    self.class,
                    component,
                    None,
                    self.declared.get(&component.attribute),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let mut descriptor = MappingDescriptor {
            class_name: self.class.to_string(),
            table_name: self.resolver.table_name(
                spec.table
                    .clone()
                    .unwrap_or_else(|| name::table(self.class)),
            ),
            primary_key,
            fields,
            components,
            many_to_one: vec![],
            one_to_many: vec![],
            many_to_many: vec![],
        };

        for association in &spec.associations {
            match association {
                AssociationSpec::ManyToOne(spec) => {
                    let target = self.target(
                        &spec.attribute,
                        spec.target.as_ref(),
                        Multiplicity::One,
                        "many-to-one",
                        spec.override_convention,
                    )?;

                    descriptor.many_to_one.push(ManyToOne {
                        attribute: spec.attribute.clone(),
                        foreign_key: spec
                            .foreign_key
                            .clone()
                            .unwrap_or_else(|| name::foreign_key(&spec.attribute)),
                        target,
                        lazy: true,
                    });
                }
                AssociationSpec::OneToMany(spec) => {
                    let target = self.target(
                        &spec.attribute,
                        spec.target.as_ref(),
                        Multiplicity::Many,
                        "one-to-many",
                        spec.override_convention,
                    )?;

                    descriptor.one_to_many.push(OneToMany {
                        attribute: spec.attribute.clone(),
                        target,
                        inverse_column: spec
                            .inverse_column
                            .clone()
                            .unwrap_or_else(|| name::inverse_column(self.class)),
                        lazy: true,
                    });
                }
                AssociationSpec::ManyToMany(spec) => {
                    let target = self.target(
                        &spec.attribute,
                        spec.target.as_ref(),
                        Multiplicity::Many,
                        "many-to-many",
                        spec.override_convention,
                    )?;

                    let origin_column = spec
                        .origin_column
                        .clone()
                        .unwrap_or_else(|| name::join_column(self.class));
                    let target_column = spec
                        .target_column
                        .clone()
                        .unwrap_or_else(|| name::join_column(&target));

                    if origin_column == target_column {
                        return Err(Error::ambiguous_mapping(
                            self.class,
                            &spec.attribute,
                            format!(
                                "join columns of `{target}` both default to `{origin_column}`; \
                                 specify origin_column and target_column"
                            ),
                        ));
                    }

                    descriptor.many_to_many.push(ManyToMany {
                        attribute: spec.attribute.clone(),
                        join_table: self.resolver.table_name(
                            spec.join_table
                                .clone()
                                .unwrap_or_else(|| name::join_table(self.class, &target)),
                        ),
                        target,
                        origin_column,
                        target_column,
                        lazy: true,
                    });
                }
            }
        }

        Ok(descriptor)
    }

    /// The identity binding: attribute `id` unless specified. A field entry
    /// with the same attribute contributes its column and type.
    fn primary_key(&self, spec: &MappingSpec) -> Result<PrimaryKey> {
        let mut pk = spec
            .primary_key
            .clone()
            .unwrap_or_else(|| FieldSpec::new("id"));

        if let Some(listed) = spec.fields.iter().find(|f| f.attribute == pk.attribute) {
            pk.column = pk.column.or_else(|| listed.column.clone());
            pk.ty = pk.ty.or(listed.ty);
            pk.override_convention |= listed.override_convention;
        }

        // Keys generated by the store are integers.
        let ty = self
            .scalar_type(self.class, &pk, self.declared.get(&pk.attribute))?
            .unwrap_or(Type::Integer);

        Ok(PrimaryKey {
            column: pk.column.unwrap_or_else(|| name::column(&pk.attribute)),
            attribute: pk.attribute,
            ty,
        })
    }

    fn field(
        &self,
        owner: &str,
        spec: &FieldSpec,
        declared: &IndexMap<String, DeclaredAttribute>,
        column: String,
    ) -> Result<FieldBinding> {
        let ty = self
            .scalar_type(owner, spec, declared.get(&spec.attribute))?
            .ok_or_else(|| Error::missing_type_information(owner, &spec.attribute))?;

        Ok(FieldBinding::new(&spec.attribute, column, ty))
    }

    /// Type of a scalar attribute: the specified type, else the declared
    /// one. `None` when neither source has one.
    fn scalar_type(
        &self,
        owner: &str,
        spec: &FieldSpec,
        declared: Option<&DeclaredAttribute>,
    ) -> Result<Option<Type>> {
        let declared_ty = match declared {
            None => None,
            Some(DeclaredAttribute {
                ty: DeclaredType::Scalar(ty),
                multiplicity: Multiplicity::One,
                ..
            }) => Some(*ty),
            Some(_) if spec.override_convention && spec.ty.is_some() => None,
            Some(other) => {
                return Err(Error::ambiguous_mapping(
                    owner,
                    &spec.attribute,
                    format!(
                        "mapped as a field but declared as {} ({})",
                        other.ty, other.multiplicity
                    ),
                ))
            }
        };

        match (spec.ty, declared_ty) {
            (Some(ty), Some(declared)) if ty != declared && !spec.override_convention => {
                Err(Error::ambiguous_mapping(
                    owner,
                    &spec.attribute,
                    format!("specified as {ty} but declared as {declared}"),
                ))
            }
            (Some(ty), _) => Ok(Some(ty)),
            (None, declared) => Ok(declared),
        }
    }

    fn component(
        &self,
        owner: &str,
        spec: &ComponentSpec,
        parent_prefix: Option<&str>,
        declared: Option<&DeclaredAttribute>,
    ) -> Result<ComponentBinding> {
        let declared_class = match declared {
            None => None,
            Some(DeclaredAttribute {
                ty: DeclaredType::Embedded(class),
                ..
            }) => Some(class.as_str()),
            Some(_) if spec.override_convention => None,
            Some(other) => {
                return Err(Error::ambiguous_mapping(
                    owner,
                    &spec.attribute,
                    format!("mapped as a component but declared as {}", other.ty),
                ))
            }
        };

        if let (Some(specified), Some(declared)) = (&spec.class, declared_class) {
            if specified != declared && !spec.override_convention {
                return Err(Error::ambiguous_mapping(
                    owner,
                    &spec.attribute,
                    format!("specified as embedded {specified} but declared as embedded {declared}"),
                ));
            }
        }

        let members = spec
            .class
            .as_deref()
            .or(declared_class)
            .and_then(|class| self.resolver.declared(class))
            .map(index)
            .unwrap_or_default();

        let prefix = spec
            .prefix
            .clone()
            .unwrap_or_else(|| spec.attribute.clone());
        let prefix = match parent_prefix {
            Some(parent) => name::component_column(parent, &prefix),
            None => prefix,
        };
        let label = format!("{owner}.{}", spec.attribute);

        let derived;
        let spec = if spec.fields.is_empty() && spec.components.is_empty() {
            if members.is_empty() {
                return Err(Error::missing_type_information(owner, &spec.attribute));
            }
            derived = derive_component(&label, spec, &members)?;
            &derived
        } else {
            spec
        };

        let fields = spec
            .fields
            .iter()
            .map(|field| {
                let column = field
                    .column
                    .clone()
                    .unwrap_or_else(|| name::component_column(&prefix, &field.attribute));
                self.field(&label, field, &members, column)
            })
            .collect::<Result<Vec<_>>>()?;

        let components = spec
            .components
            .iter()
            .map(|nested| {
                self.component(&label, nested, Some(&prefix), members.get(&nested.attribute))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ComponentBinding {
            attribute: spec.attribute.clone(),
            prefix,
            fields,
            components,
        })
    }

    /// Target class of an association: the specified target, else the
    /// declared reference type. The target must be known.
    fn target(
        &self,
        attribute: &str,
        specified: Option<&String>,
        expected: Multiplicity,
        kind: &str,
        override_convention: bool,
    ) -> Result<String> {
        let declared = match self.declared.get(attribute) {
            None => None,
            Some(DeclaredAttribute {
                ty: DeclaredType::Reference(target),
                multiplicity,
                ..
            }) => {
                if *multiplicity != expected && !override_convention {
                    return Err(Error::ambiguous_mapping(
                        self.class,
                        attribute,
                        format!("mapped as {kind} but declared with multiplicity {multiplicity}"),
                    ));
                }
                Some(target)
            }
            Some(_) if override_convention => None,
            Some(other) => {
                return Err(Error::ambiguous_mapping(
                    self.class,
                    attribute,
                    format!("mapped as {kind} but declared as {}", other.ty),
                ))
            }
        };

        let target = match (specified, declared) {
            (Some(specified), Some(declared)) if specified != declared && !override_convention => {
                return Err(Error::ambiguous_mapping(
                    self.class,
                    attribute,
                    format!("targets {specified} but declared as a reference to {declared}"),
                ))
            }
            (Some(specified), _) => specified.clone(),
            (None, Some(declared)) => declared.clone(),
            (None, None) => return Err(Error::missing_type_information(self.class, attribute)),
        };

        if !(self.is_known)(&target) {
            return Err(Error::unknown_target_class(self.class, attribute, target));
        }

        Ok(target)
    }
}

/// Lists the declared members of an embedded class as component fields and
/// nested components.
fn derive_component(
    label: &str,
    spec: &ComponentSpec,
    members: &IndexMap<String, DeclaredAttribute>,
) -> Result<ComponentSpec> {
    let mut derived = ComponentSpec {
        fields: vec![],
        components: vec![],
        ..spec.clone()
    };

    for member in members.values() {
        match &member.ty {
            DeclaredType::Scalar(_) => derived.fields.push(FieldSpec::new(&member.name)),
            DeclaredType::Embedded(class) => derived
                .components
                .push(ComponentSpec::new(&member.name).class(class)),
            DeclaredType::Reference(_) => {
                return Err(Error::ambiguous_mapping(
                    label,
                    &member.name,
                    "components cannot hold associations",
                ))
            }
        }
    }

    Ok(derived)
}

fn index(attributes: Vec<DeclaredAttribute>) -> IndexMap<String, DeclaredAttribute> {
    attributes
        .into_iter()
        .map(|attribute| (attribute.name.clone(), attribute))
        .collect()
}
