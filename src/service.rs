use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{error, info};

use crate::config::PaginationConfig;
use crate::domain::person::PersonFilter;
use crate::domain::relation::RelationFilter;
use crate::proto::gen_tree_server::GenTree;
use crate::proto::{
    CreateRelationResult, DeletePersonResult, ListPeopleRequest, ListRelationsRequest,
    NewRelation, Person, PersonPage, PersonRelationRequest, PersonRequest, Relation, RelationPage,
    RelationRequest, RelationVerdict,
};
use crate::proto_convert::{self, ConversionError};
use crate::schema::validation;
use crate::store::memory::InMemoryStore;
use crate::store::query::PageRequest;
use crate::store::validator::Verdict;
use crate::store::{Store, StoreError};

const INTERNAL_ERROR_MESSAGE: &str = "Unexpected error occurred";

pub struct GenTreeService {
    store: Arc<InMemoryStore>,
    pagination: PaginationConfig,
}

impl GenTreeService {
    pub fn new(store: Arc<InMemoryStore>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// An absent page or a zero size selects the configured default size.
    fn page_request(&self, page: Option<crate::proto::PageRequest>) -> PageRequest {
        let page = page.unwrap_or_default();
        let size = match page.page_size {
            0 => self.pagination.default_page_size as i64,
            size => size,
        };
        PageRequest::new(page.page_index, size)
    }
}

fn store_error_to_status(err: StoreError) -> Status {
    match err {
        StoreError::PersonNotFound(_) | StoreError::RelationNotFound(_) => {
            Status::not_found(err.to_string())
        }
        StoreError::PersonAlreadyExists(_) | StoreError::RelationAlreadyExists { .. } => {
            Status::already_exists(err.to_string())
        }
        StoreError::InvalidRelation { .. } | StoreError::Pagination(_) => {
            Status::invalid_argument(err.to_string())
        }
        StoreError::DuplicateFound { .. } | StoreError::IdGenerationFailed(_) => {
            error!("{err}");
            Status::internal(INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn validation_error_to_status(err: validation::ValidationError) -> Status {
    info!("rejected request: {err}");
    Status::invalid_argument(err.to_string())
}

fn conversion_error_to_status(err: ConversionError) -> Status {
    Status::invalid_argument(err.to_string())
}

#[tonic::async_trait]
impl GenTree for GenTreeService {
    async fn create_person(&self, request: Request<Person>) -> Result<Response<Person>, Status> {
        let person = request.into_inner();
        validation::validate_person(&person).map_err(validation_error_to_status)?;
        let person =
            proto_convert::proto_person_to_domain(person).map_err(conversion_error_to_status)?;
        let created = self
            .store
            .create_person(person)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(proto_convert::domain_person_to_proto(created)))
    }

    async fn get_person(
        &self,
        request: Request<PersonRequest>,
    ) -> Result<Response<Person>, Status> {
        let req = request.into_inner();
        validation::validate_person_id(&req.id).map_err(validation_error_to_status)?;
        let person = self
            .store
            .get_person(&req.id)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(proto_convert::domain_person_to_proto(person)))
    }

    async fn replace_person(&self, request: Request<Person>) -> Result<Response<Person>, Status> {
        let person = request.into_inner();
        validation::validate_person(&person).map_err(validation_error_to_status)?;
        let person =
            proto_convert::proto_person_to_domain(person).map_err(conversion_error_to_status)?;
        let replaced = self
            .store
            .replace_person(person)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(proto_convert::domain_person_to_proto(replaced)))
    }

    async fn delete_person(
        &self,
        request: Request<PersonRequest>,
    ) -> Result<Response<DeletePersonResult>, Status> {
        let req = request.into_inner();
        validation::validate_person_id(&req.id).map_err(validation_error_to_status)?;
        let deleted = self
            .store
            .delete_person(&req.id)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(DeletePersonResult {
            id: req.id,
            deleted_relation_count: deleted as u64,
        }))
    }

    async fn list_people(
        &self,
        request: Request<ListPeopleRequest>,
    ) -> Result<Response<PersonPage>, Status> {
        let req = request.into_inner();
        let filter = match req.filter {
            Some(filter) => {
                validation::validate_person_filter(&filter)
                    .map_err(validation_error_to_status)?;
                PersonFilter::ids(filter.ids)
            }
            None => PersonFilter::any(),
        };
        let page = self
            .store
            .list_people(self.page_request(req.page), self.pagination.bounds(), &filter)
            .await
            .map_err(store_error_to_status)?;
        let pagination = proto_convert::page_to_pagination(&page);
        Ok(Response::new(PersonPage {
            records: page
                .records
                .into_iter()
                .map(proto_convert::domain_person_to_proto)
                .collect(),
            pagination: Some(pagination),
        }))
    }

    async fn create_relation(
        &self,
        request: Request<NewRelation>,
    ) -> Result<Response<CreateRelationResult>, Status> {
        let req = request.into_inner();
        validation::validate_new_relation(&req).map_err(validation_error_to_status)?;
        let key =
            proto_convert::proto_new_relation_to_domain(req).map_err(conversion_error_to_status)?;
        let relation = self
            .store
            .create_relation(key)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(CreateRelationResult {
            relation_id: relation.id,
        }))
    }

    async fn create_person_relation(
        &self,
        request: Request<PersonRelationRequest>,
    ) -> Result<Response<CreateRelationResult>, Status> {
        let req = request.into_inner();
        validation::validate_person_relation_request(&req).map_err(validation_error_to_status)?;
        let key = proto_convert::proto_person_relation_to_domain(req)
            .map_err(conversion_error_to_status)?;
        let relation = self
            .store
            .create_relation(key)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(CreateRelationResult {
            relation_id: relation.id,
        }))
    }

    async fn validate_relation(
        &self,
        request: Request<NewRelation>,
    ) -> Result<Response<RelationVerdict>, Status> {
        let req = request.into_inner();
        validation::validate_new_relation(&req).map_err(validation_error_to_status)?;
        let key =
            proto_convert::proto_new_relation_to_domain(req).map_err(conversion_error_to_status)?;
        let verdict = self
            .store
            .validate_relation(&key)
            .await
            .map_err(store_error_to_status)?;
        let result = match verdict {
            Verdict::Valid => RelationVerdict {
                valid: true,
                reason: String::new(),
            },
            Verdict::Invalid(violation) => RelationVerdict {
                valid: false,
                reason: violation.to_string(),
            },
        };
        Ok(Response::new(result))
    }

    async fn get_relation(
        &self,
        request: Request<RelationRequest>,
    ) -> Result<Response<Relation>, Status> {
        let req = request.into_inner();
        validation::validate_relation_id(req.id).map_err(validation_error_to_status)?;
        let relation = self
            .store
            .get_relation(req.id)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(proto_convert::domain_relation_to_proto(relation)))
    }

    async fn replace_relation(
        &self,
        request: Request<Relation>,
    ) -> Result<Response<Relation>, Status> {
        let relation = request.into_inner();
        validation::validate_relation(&relation).map_err(validation_error_to_status)?;
        let relation =
            proto_convert::proto_relation_to_domain(relation).map_err(conversion_error_to_status)?;
        let replaced = self
            .store
            .replace_relation(relation)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(proto_convert::domain_relation_to_proto(replaced)))
    }

    async fn delete_relation(
        &self,
        request: Request<RelationRequest>,
    ) -> Result<Response<Relation>, Status> {
        let req = request.into_inner();
        validation::validate_relation_id(req.id).map_err(validation_error_to_status)?;
        let deleted = self
            .store
            .delete_relation(req.id)
            .await
            .map_err(store_error_to_status)?;
        Ok(Response::new(proto_convert::domain_relation_to_proto(deleted)))
    }

    async fn list_relations(
        &self,
        request: Request<ListRelationsRequest>,
    ) -> Result<Response<RelationPage>, Status> {
        let req = request.into_inner();
        let filter = if req.person_id.is_empty() {
            RelationFilter::any()
        } else {
            validation::validate_person_id(&req.person_id).map_err(validation_error_to_status)?;
            RelationFilter::involving(req.person_id)
        };
        let page = self
            .store
            .list_relations(self.page_request(req.page), self.pagination.bounds(), &filter)
            .await
            .map_err(store_error_to_status)?;
        let pagination = proto_convert::page_to_pagination(&page);
        Ok(Response::new(RelationPage {
            records: page
                .records
                .into_iter()
                .map(proto_convert::domain_relation_to_proto)
                .collect(),
            pagination: Some(pagination),
        }))
    }
}
