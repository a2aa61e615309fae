//! A scene location backed by a stage prim.

use std::path::Path as FsPath;
use std::sync::Arc;

use murmur3::MurmurHash;

use super::path::{decode_name, stage_to_path};
use super::session::{OpenMode, Session, WriteOptions};
use super::{attributes, hash, hierarchy, sets};
use crate::geom::{self, xform};
use crate::scene::{
    Data, HashType, MissingBehaviour, Object, Path, PathSet, PrimitiveVariableMap, SceneInterface,
    TagFilter,
};
use crate::stage::{tokens, ScalarType, StagePath, UpAxis, Value, ValueTypeName};
use crate::util::{BBox3d, Chrono, DMat4, Error, Result};

/// Z-up → Y-up basis change applied to top-level prims of Z-up stages.
const Z_UP_TO_Y_UP: [[f64; 4]; 4] = [
    [0.0, 0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// One location in a stage-backed scene. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Location {
    session: Arc<Session>,
    path: StagePath,
}

impl Location {
    /// Open the root location of the stage at `path`.
    pub fn open(path: impl AsRef<FsPath>, mode: OpenMode) -> Result<Self> {
        Ok(Self::root(Session::open(path, mode)?))
    }

    /// Create a new stage at `path` and return its root location.
    pub fn create(path: impl AsRef<FsPath>, options: &WriteOptions) -> Result<Self> {
        Ok(Self::root(Session::writer(path, options)?))
    }

    /// The root location of `session`.
    pub fn root(session: Arc<Session>) -> Self {
        Self {
            session,
            path: StagePath::absolute_root(),
        }
    }

    #[inline]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[inline]
    pub fn stage_path(&self) -> &StagePath {
        &self.path
    }

    fn at(&self, path: StagePath) -> Self {
        Self {
            session: Arc::clone(&self.session),
            path,
        }
    }

    fn time_code(&self, time: Chrono) -> crate::core::TimeCode {
        self.session.time_code(time)
    }

    fn is_z_up_top_level(&self) -> bool {
        self.path.parent().as_ref().is_some_and(StagePath::is_root)
            && self.session.stage().up_axis() == UpAxis::Z
    }
}

impl SceneInterface for Location {
    fn file_name(&self) -> String {
        self.session.file_name().to_string()
    }

    fn name(&self) -> String {
        decode_name(self.path.name())
    }

    fn path(&self) -> Path {
        stage_to_path(&self.path)
    }

    // --- bound ---

    fn has_bound(&self) -> bool {
        self.session
            .stage()
            .prim(&self.path)
            .is_some_and(|p| p.schema_type().is_boundable())
    }

    fn read_bound(&self, time: Chrono) -> BBox3d {
        let stage = self.session.stage();
        stage
            .prim(&self.path)
            .filter(|p| p.schema_type().is_boundable())
            .and_then(|p| p.attribute(tokens::EXTENT))
            .and_then(|a| a.get(self.time_code(time)))
            .and_then(Value::as_float3_array)
            .and_then(BBox3d::from_extent)
            .unwrap_or(BBox3d::EMPTY)
    }

    fn write_bound(&self, bound: &BBox3d, time: Chrono) -> Result<()> {
        self.session.check_writable("write_bound")?;
        if self.path.is_root() {
            return Ok(());
        }
        let time = self.time_code(time);
        let mut stage = self.session.stage_mut();
        let Some(prim) = stage
            .prim_mut(&self.path)
            .filter(|p| p.schema_type().is_boundable())
        else {
            return Ok(());
        };
        prim.create_attribute(tokens::EXTENT, ValueTypeName::array(ScalarType::Float3), false)
            .set(Value::Float3Array(bound.to_extent()), time)
    }

    // --- transform ---

    fn read_transform(&self, time: Chrono) -> Data {
        Data::M44d(self.read_transform_as_matrix(time))
    }

    fn read_transform_as_matrix(&self, time: Chrono) -> DMat4 {
        let local = {
            let stage = self.session.stage();
            stage
                .prim(&self.path)
                .filter(|p| p.schema_type().is_xformable())
                .map(|p| xform::local_transform(p, self.time_code(time)))
                .unwrap_or(DMat4::IDENTITY)
        };
        if self.is_z_up_top_level() {
            DMat4::from_cols_array_2d(&Z_UP_TO_Y_UP) * local
        } else {
            local
        }
    }

    fn write_transform(&self, transform: &Data, time: Chrono) -> Result<()> {
        self.session.check_writable("write_transform")?;
        let Data::M44d(matrix) = transform else {
            return Ok(());
        };
        let time = self.time_code(time);
        let mut stage = self.session.stage_mut();
        match stage
            .prim_mut(&self.path)
            .filter(|p| p.schema_type().is_xformable())
        {
            Some(prim) => xform::set_matrix(prim, matrix, time),
            None => Ok(()),
        }
    }

    // --- attributes ---

    fn has_attribute(&self, name: &str) -> bool {
        self.session
            .stage()
            .prim(&self.path)
            .is_some_and(|p| attributes::has_attribute(p, name))
    }

    fn attribute_names(&self) -> Vec<String> {
        self.session
            .stage()
            .prim(&self.path)
            .map(attributes::attribute_names)
            .unwrap_or_default()
    }

    fn read_attribute(&self, name: &str, time: Chrono) -> Option<Data> {
        let stage = self.session.stage();
        let prim = stage.prim(&self.path)?;
        attributes::read_attribute(prim, name, self.time_code(time), self.session.diagnostics())
    }

    fn write_attribute(&self, name: &str, value: &Data, time: Chrono) -> Result<()> {
        self.session.check_writable("write_attribute")?;
        let time = self.time_code(time);
        let mut stage = self.session.stage_mut();
        let prim = stage
            .prim_mut(&self.path)
            .ok_or_else(|| Error::PrimNotFound(self.path.to_string()))?;
        attributes::write_attribute(prim, name, value, time)
    }

    // --- tags ---

    fn has_tag(&self, name: &str, filter: TagFilter) -> bool {
        sets::has_tag(&self.session.stage(), &self.path, name, filter)
    }

    fn read_tags(&self, filter: TagFilter) -> Vec<String> {
        sets::read_tags(&self.session.stage(), &self.path, filter)
    }

    fn write_tags(&self, tags: &[String]) -> Result<()> {
        self.session.check_writable("write_tags")?;
        sets::write_tags(&mut self.session.stage_mut(), &self.path, tags)
    }

    // --- sets ---

    fn set_names(&self, include_descendant_sets: bool) -> Vec<String> {
        sets::set_names(&self.session.stage(), &self.path, include_descendant_sets)
    }

    fn read_set(&self, name: &str, include_descendant_sets: bool) -> PathSet {
        sets::read_set(&self.session.stage(), &self.path, name, include_descendant_sets)
    }

    fn write_set(&self, name: &str, set: &PathSet) -> Result<()> {
        self.session.check_writable("write_set")?;
        sets::write_set(
            &mut self.session.stage_mut(),
            &self.path,
            name,
            set,
            self.session.diagnostics(),
        )
    }

    fn hash_set(&self, name: &str, h: &mut MurmurHash) {
        sets::hash_set(self.session.file_name(), &self.path(), name, h);
    }

    // --- object ---

    fn has_object(&self) -> bool {
        self.session
            .stage()
            .prim(&self.path)
            .is_some_and(geom::is_convertible)
    }

    fn read_object(&self, time: Chrono) -> Option<Object> {
        let stage = self.session.stage();
        let prim = stage.prim(&self.path)?;
        geom::read_object(prim, self.time_code(time), self.session.diagnostics())
    }

    fn read_object_primitive_variables(&self, names: &[&str], time: Chrono) -> PrimitiveVariableMap {
        self.read_object(time)
            .map(|object| geom::select_primitive_variables(&object, names))
            .unwrap_or_default()
    }

    fn write_object(&self, object: &Object, time: Chrono) -> Result<()> {
        self.session.check_writable("write_object")?;
        let time = self.time_code(time);
        geom::write_object(
            &mut self.session.stage_mut(),
            &self.path,
            object,
            time,
            self.session.diagnostics(),
        )
    }

    // --- hierarchy ---

    fn child_names(&self) -> Vec<String> {
        hierarchy::child_names(&self.session.stage(), &self.path)
    }

    fn has_child(&self, name: &str) -> bool {
        hierarchy::has_child(&self.session.stage(), &self.path, name)
    }

    fn child(&self, name: &str, missing: MissingBehaviour) -> Result<Option<Self>> {
        let found = hierarchy::resolve_child(&self.session.stage(), &self.path, name);
        if let Some(path) = found {
            return Ok(Some(self.at(path)));
        }
        match missing {
            MissingBehaviour::NullIfMissing => Ok(None),
            MissingBehaviour::ThrowIfMissing => Err(Error::MissingChild(name.to_string())),
            MissingBehaviour::CreateIfMissing => {
                if !self.session.is_writable() {
                    return Err(Error::invalid_argument("Child creation not supported"));
                }
                let path = hierarchy::create_child(&mut self.session.stage_mut(), &self.path, name)?;
                Ok(Some(self.at(path)))
            }
        }
    }

    fn scene(&self, path: &[String], missing: MissingBehaviour) -> Result<Option<Self>> {
        let mut location = Self::root(Arc::clone(&self.session));
        for name in path {
            match location.child(name, missing)? {
                Some(child) => location = child,
                None => return Ok(None),
            }
        }
        Ok(Some(location))
    }

    // --- hashing ---

    fn hash(&self, hash_type: HashType, time: Chrono, h: &mut MurmurHash) {
        hash::hash(
            &self.session.stage(),
            self.session.file_name(),
            &self.path,
            hash_type,
            time,
            h,
        );
    }
}
