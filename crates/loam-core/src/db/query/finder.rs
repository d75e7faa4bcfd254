use crate::{
    db::{
        Db,
        load::LoadExecutor,
        query::{Filter, FilterValue, Plan, SetExpr, Terminal},
    },
    error::Error,
    model::{Object, Schema},
    store::{Reply, Store},
};

///
/// Finder
///
/// A lazily-evaluated query over one model. Every combinator is pure: it
/// returns a new finder and never touches the store. Only the terminal
/// operations (`size`, `ids`, `includes`, `fetch`) evaluate the expression.
///

pub struct Finder<'db, S> {
    db: &'db Db<S>,
    schema: &'static Schema,
    expr: SetExpr,
}

impl<S> core::fmt::Debug for Finder<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Finder")
            .field("schema", &self.schema)
            .field("expr", &self.expr)
            .finish_non_exhaustive()
    }
}

impl<S> Clone for Finder<'_, S> {
    fn clone(&self) -> Self {
        Self {
            db: self.db,
            schema: self.schema,
            expr: self.expr.clone(),
        }
    }
}

impl<'db, S: Store> Finder<'db, S> {
    const fn new(db: &'db Db<S>, schema: &'static Schema, expr: SetExpr) -> Self {
        Self { db, schema, expr }
    }

    /// The identity finder: its expression is exactly the membership set,
    /// so every combinator composes from it.
    #[must_use]
    pub(crate) fn all(db: &'db Db<S>, schema: &'static Schema) -> Self {
        Self::new(db, schema, SetExpr::Key(schema.keys().all()))
    }

    /// Finder over the intersection of the filter's index sets. An empty
    /// filter is the membership set.
    pub(crate) fn filtered(
        db: &'db Db<S>,
        schema: &'static Schema,
        filter: &Filter,
    ) -> Result<Self, Error> {
        let parts = index_exprs(schema, filter)?;

        let expr = if parts.is_empty() {
            SetExpr::Key(schema.keys().all())
        } else {
            SetExpr::inter(parts)
        };

        Ok(Self::new(db, schema, expr))
    }

    #[must_use]
    pub const fn schema(&self) -> &'static Schema {
        self.schema
    }

    #[must_use]
    pub const fn expr(&self) -> &SetExpr {
        &self.expr
    }

    // ======================================================================
    // Combinators (pure)
    // ======================================================================

    /// Narrow: intersect with the index set of every (field, value) pair.
    pub fn find(&self, filter: impl Into<Filter>) -> Result<Self, Error> {
        let parts = index_exprs(self.schema, &filter.into())?;
        if parts.is_empty() {
            return Ok(self.clone());
        }

        // chained finds flatten into one intersection
        let mut joined = match self.expr.clone() {
            SetExpr::Inter(existing) => existing,
            other => vec![other],
        };
        joined.extend(parts);

        Ok(Self::new(self.db, self.schema, SetExpr::inter(joined)))
    }

    /// Broaden: union with the intersection of the filter's index sets.
    pub fn union(&self, filter: impl Into<Filter>) -> Result<Self, Error> {
        let parts = index_exprs(self.schema, &filter.into())?;
        if parts.is_empty() {
            return Ok(self.clone());
        }

        let expr = SetExpr::Union(vec![self.expr.clone(), SetExpr::inter(parts)]);

        Ok(Self::new(self.db, self.schema, expr))
    }

    /// Exclude: subtract the union of the filter's index sets.
    pub fn except(&self, filter: impl Into<Filter>) -> Result<Self, Error> {
        let parts = index_exprs(self.schema, &filter.into())?;
        if parts.is_empty() {
            return Ok(self.clone());
        }

        let expr = SetExpr::Diff(vec![self.expr.clone(), SetExpr::union_of(parts)]);

        Ok(Self::new(self.db, self.schema, expr))
    }

    /// Require any-of: intersect with the union of the filter's index sets,
    /// broadening one constraint while keeping the rest.
    pub fn combine(&self, filter: impl Into<Filter>) -> Result<Self, Error> {
        let parts = index_exprs(self.schema, &filter.into())?;
        if parts.is_empty() {
            return Ok(self.clone());
        }

        let expr = SetExpr::Inter(vec![self.expr.clone(), SetExpr::union_of(parts)]);

        Ok(Self::new(self.db, self.schema, expr))
    }

    // ======================================================================
    // Terminals (evaluate against the store)
    // ======================================================================

    /// Cardinality of the evaluated set.
    pub fn size(&self) -> Result<u64, Error> {
        let reply = self.evaluate(Terminal::Card)?;

        Ok(reply.as_int().and_then(|n| u64::try_from(n).ok()).unwrap_or(0))
    }

    /// Membership test by id.
    pub fn includes_id(&self, id: &str) -> Result<bool, Error> {
        let reply = self.evaluate(Terminal::IsMember(id))?;

        Ok(reply.as_int() == Some(1))
    }

    /// Membership test. An instance with no id is never included, answered
    /// without a store call.
    pub fn includes(&self, object: &Object) -> Result<bool, Error> {
        match object.id() {
            Some(id) => self.includes_id(id),
            None => Ok(false),
        }
    }

    /// Member ids, in the store's set enumeration order.
    pub fn ids(&self) -> Result<Vec<String>, Error> {
        let reply = self.evaluate(Terminal::Members)?;

        Ok(reply.into_strings())
    }

    /// Hydrate every member in one pipelined batch read.
    pub fn fetch(&self) -> Result<Vec<Object>, Error> {
        let ids = self.ids()?;

        LoadExecutor::new(self.db).fetch_ids(self.schema, &ids)
    }

    /// First hydrated member, if any.
    pub fn first(&self) -> Result<Option<Object>, Error> {
        Ok(self.fetch()?.into_iter().next())
    }

    fn evaluate(&self, terminal: Terminal<'_>) -> Result<Reply, Error> {
        let plan = Plan::compile(self.schema.keys(), &self.expr, terminal);

        Ok(plan.execute(self.db.store())?)
    }
}

/// Lower a filter into per-entry expressions, validating every field
/// against the model's declared indices.
fn index_exprs(schema: &Schema, filter: &Filter) -> Result<Vec<SetExpr>, Error> {
    let keys = schema.keys();
    let mut parts = Vec::with_capacity(filter.len());

    for (field, value) in filter.iter() {
        if !schema.is_index(field) {
            return Err(Error::IndexNotFound {
                field: field.clone(),
            });
        }

        match value {
            FilterValue::One(v) => parts.push(SetExpr::Key(keys.index(field, v))),
            FilterValue::Any(vs) => parts.push(SetExpr::union_of(
                vs.iter().map(|v| SetExpr::Key(keys.index(field, v))).collect(),
            )),
        }
    }

    Ok(parts)
}
