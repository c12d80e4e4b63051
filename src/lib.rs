pub mod core;
pub mod schema;
pub mod index;
pub mod engine;
pub mod oracle;
pub mod dataset;

/*
┌──────────────────────────────────────────────────────────────────────────┐
│                        ORDINEX STRUCT ARCHITECTURE                        │
└──────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── DATA LAYER ──────────────────────────────┐
│                                                                           │
│  ┌──────────────────┐  ┌─────────────────────┐  ┌─────────────────────┐  │
│  │ struct RecordId  │  │ struct Record       │  │ struct Collection   │  │
│  │ • 0: u64         │  │ • id: RecordId      │  │ • records: HashMap  │  │
│  └──────────────────┘  │ • status: String    │  │   <RecordId,Record> │  │
│                        │ • city: String      │  └─────────────────────┘  │
│  ┌──────────────────┐  │ • delivery: String  │                           │
│  │ enum Field       │  └─────────────────────┘  ┌─────────────────────┐  │
│  │ • Status         │                           │ struct Schema       │  │
│  │ • City           │                           │ • domains: [Vec;3]  │  │
│  │ • Delivery       │                           └─────────────────────┘  │
│  └──────────────────┘                                                     │
└───────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── INDEX LAYER ──────────────────────────────┐
│                                                                           │
│  ┌────────────────────────────────────────────────────────────────────┐  │
│  │                   struct FieldIndex<B: Bucket>                      │  │
│  │  buckets: [HashMap<Value, B>; 3]   // every domain value pre-seeded │  │
│  └────────────────────────────────────────────────────────────────────┘  │
│                                                                           │
│  ┌──────────────────┐  trait Bucket: insert / contains / len / ids       │
│  │ struct           │  • ListBucket        Vec<RecordId>                  │
│  │ IndexBuilder     │  • MarkerBucket      HashMap<RecordId, ()>          │
│  │ • collection     │  • FastMarkerBucket  AHashMap<RecordId, ()>         │
│  │ • schema         │  • SetBucket         HashSet<RecordId>              │
│  └──────────────────┘                                                     │
└───────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── QUERY LAYER ──────────────────────────────┐
│                                                                           │
│  ┌──────────────────────┐  ┌────────────────────────────────────────┐    │
│  │ enum Filter          │  │ struct FilterEngine<'a, B>             │    │
│  │ • Control            │  │ • index: &FieldIndex<B>                │    │
│  │ • Where(Vec<Clause>) │  │ • collection: &Collection              │    │
│  └──────────────────────┘  │ evaluate(filter, strategy)             │    │
│                            │  → Vec<&Record>                        │    │
│  ┌──────────────────────┐  └────────────────────────────────────────┘    │
│  │ enum Strategy        │                                                 │
│  │ • CountIntersection  │  ┌────────────────────────────────────────┐    │
│  │ • IterativeNarrowing │  │ struct ResultOracle                    │    │
│  └──────────────────────┘  │ validate(&[LabeledRun])                │    │
│                            │  → Ok(count) | Err(Divergence)          │    │
│                            └────────────────────────────────────────┘    │
└───────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── RELATIONSHIPS ─────────────────────────────┐
│                                                                           │
│  Collection ──feeds──> IndexBuilder ──builds──> FieldIndex<B>  (×4)      │
│                                                      │                    │
│  Filter ──evaluated_by──> FilterEngine ──reads──> FieldIndex + Collection │
│                                │                                          │
│                                └──produces──> ResultSet ──checked_by──>   │
│                                               ResultOracle                │
└───────────────────────────────────────────────────────────────────────────┘
*/
